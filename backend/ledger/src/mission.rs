use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, StoreError};

/// One checkable option on the submission form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub label: String,
    pub description: String,
}

impl Mission {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

pub fn default_missions() -> Vec<Mission> {
    vec![
        Mission::new("간식", "친구에게 몰래 간식 선물하기"),
        Mission::new("편지", "응원의 쪽지 남기기"),
        Mission::new("청소", "아무도 모르게 교실 정리하기"),
        Mission::new("칭찬", "친구 세 명 칭찬하기"),
        Mission::new("도움", "도움이 필요한 친구 돕기"),
    ]
}

/// Reads `[{"label": ..., "description": ...}, ...]` from `path`.
pub fn load_missions(path: &Path) -> Result<Vec<Mission>> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let missions: Vec<Mission> =
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Loaded {} missions from {}", missions.len(), path.display());

    Ok(missions)
}

pub fn find<'a>(missions: &'a [Mission], label: &str) -> Option<&'a Mission> {
    missions.iter().find(|mission| mission.label == label)
}
