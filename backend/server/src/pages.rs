//! # Pages
//!
//! Server-rendered HTML for the submission form and the admin views.
//!
//! Every piece of user text goes through [`escape`] before it is written out.
use std::fmt::Write;

use ledger::{ABSENT, Indexed, Mission, PRESENT, Record, Selection, SortMode};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
table{border-collapse:collapse}\
td,th{border:1px solid #999;padding:.3rem .6rem;text-align:center}\
form.inline{display:inline}";

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

pub fn index(missions: &[Mission]) -> String {
    let mut body = String::from("<h1>비밀 미션</h1>\n");
    body.push_str("<form method=\"post\" action=\"/result\">\n");
    body.push_str("<p><label>이름 <input type=\"text\" name=\"name\" required></label></p>\n");
    body.push_str("<ul>\n");

    for mission in missions {
        let _ = writeln!(
            body,
            "<li><label><input type=\"checkbox\" name=\"checks\" value=\"{label}\"> \
             <strong>{label}</strong> {description}</label></li>",
            label = escape(&mission.label),
            description = escape(&mission.description),
        );
    }

    body.push_str("</ul>\n<button type=\"submit\">제출</button>\n</form>");
    layout("비밀 미션", &body)
}

pub fn result(record: &Record, missions: &[Mission]) -> String {
    let mut body = format!("<h1>{}님, 제출 완료!</h1>\n", escape(&record.name));

    if record.checks.is_empty() {
        body.push_str("<p>완료한 미션이 없습니다.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for check in &record.checks {
            let description = ledger::mission::find(missions, check)
                .map(|mission| mission.description.as_str())
                .unwrap_or_default();
            let _ = writeln!(
                body,
                "<li><strong>{}</strong> {}</li>",
                escape(check),
                escape(description)
            );
        }
        body.push_str("</ul>\n");
    }

    if let Some(time) = &record.time {
        let _ = writeln!(body, "<p>제출 시각: {}</p>", escape(time));
    }

    body.push_str("<p><a href=\"/\">처음으로</a></p>");
    layout("제출 완료", &body)
}

pub fn admin() -> String {
    layout(
        "관리자",
        "<h1>관리자</h1>\n<ul>\n\
         <li><a href=\"/admin/summary\">전체 기록</a></li>\n\
         <li><a href=\"/admin/summary?sort=name\">이름순 기록</a></li>\n\
         <li><a href=\"/admin/export\">CSV 내려받기</a></li>\n\
         </ul>",
    )
}

pub fn summary(entries: &[Indexed<'_>], missions: &[Mission], selection: &Selection) -> String {
    let mut body = String::from("<h1>기록 요약</h1>\n");
    body.push_str(&search_form(selection));

    let _ = write!(body, "<p>{} 건", entries.len());
    if selection.is_filtered() {
        body.push_str(" (필터 적용) · <a href=\"/admin/summary\">전체 보기</a>");
    }
    let _ = writeln!(
        body,
        " · <a href=\"/admin/export?{}\">CSV 내려받기</a></p>",
        query_string(selection)
    );

    body.push_str("<table>\n<tr><th>#</th><th>이름</th>");
    for mission in missions {
        let _ = write!(
            body,
            "<th title=\"{}\">{}</th>",
            escape(&mission.description),
            escape(&mission.label)
        );
    }
    body.push_str("<th>시각</th><th>관리</th></tr>\n");

    for entry in entries {
        let record = entry.record;
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td>",
            entry.index,
            escape(&record.name)
        );

        for mission in missions {
            let mark = if record.has_check(&mission.label) {
                PRESENT
            } else {
                ABSENT
            };
            let _ = write!(body, "<td>{mark}</td>");
        }

        let _ = writeln!(
            body,
            "<td>{time}</td><td>\
             <form class=\"inline\" method=\"post\" action=\"/admin/edit/{index}\">\
             <input type=\"text\" name=\"name\" value=\"{name}\">\
             <button type=\"submit\">수정</button></form> \
             <form class=\"inline\" method=\"post\" action=\"/admin/delete/{index}\">\
             <button type=\"submit\">삭제</button></form></td></tr>",
            time = escape(record.time.as_deref().unwrap_or_default()),
            index = entry.index,
            name = escape(&record.name),
        );
    }

    body.push_str("</table>\n<p><a href=\"/admin\">관리자 홈</a></p>");
    layout("기록 요약", &body)
}

fn search_form(selection: &Selection) -> String {
    let selected = |mode: SortMode| {
        if selection.sort == mode {
            " selected"
        } else {
            ""
        }
    };

    format!(
        "<form method=\"get\" action=\"/admin/summary\">\n\
         <label>이름 <input type=\"text\" name=\"q\" value=\"{q}\"></label>\n\
         <label>날짜 <input type=\"text\" name=\"date\" placeholder=\"YYYY-MM-DD\" \
         value=\"{date}\"></label>\n\
         <select name=\"sort\"><option value=\"time\"{by_time}>시간순</option>\
         <option value=\"name\"{by_name}>이름순</option></select>\n\
         <button type=\"submit\">검색</button>\n</form>\n",
        q = escape(selection.name.as_deref().unwrap_or_default()),
        date = escape(selection.date.as_deref().unwrap_or_default()),
        by_time = selected(SortMode::ByTime),
        by_name = selected(SortMode::ByName),
    )
}

/// Query string that reproduces `selection` on another admin route.
pub fn query_string(selection: &Selection) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(name) = &selection.name {
        query.append_pair("q", name);
    }
    if let Some(date) = &selection.date {
        query.append_pair("date", date);
    }
    query.append_pair("sort", selection.sort.as_str());

    escape(&query.finish())
}

#[cfg(test)]
mod tests {
    use ledger::indexed;

    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("<b>\"Kim\" & 'Lee'</b>"),
            "&lt;b&gt;&quot;Kim&quot; &amp; &#39;Lee&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn index_lists_every_mission() {
        let missions = ledger::default_missions();
        let html = index(&missions);
        for mission in &missions {
            assert!(html.contains(&format!("value=\"{}\"", mission.label)));
        }
    }

    #[test]
    fn summary_shows_original_index_and_grid() {
        let missions = vec![Mission::new("a", "A"), Mission::new("b", "B")];
        let records = vec![
            Record::new("<script>", ["a"], Some("2024-05-01 10:00:00".into())),
            Record::new("Lee", ["b"], None),
        ];
        let mut entries = indexed(&records);
        entries.reverse();

        let html = summary(&entries, &missions, &Selection::default());
        assert!(html.contains("<tr><td>1</td><td>Lee</td><td>-</td><td>O</td>"));
        assert!(html.contains("<tr><td>0</td><td>&lt;script&gt;</td><td>O</td><td>-</td>"));
        assert!(html.contains("action=\"/admin/delete/0\""));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn summary_marks_filtered_views() {
        let missions = vec![Mission::new("a", "A")];
        let records = vec![Record::new("Kim", ["a"], None)];

        let html = summary(&indexed(&records), &missions, &Selection::default());
        assert!(html.contains("<p>1 건 · <a href=\"/admin/export?sort=time\">"));
        assert!(!html.contains("필터 적용"));

        let selection = Selection::new(Some("kim"), None, SortMode::ByTime);
        let html = summary(&selection.apply(&records), &missions, &selection);
        assert!(html.contains("<p>1 건 (필터 적용) · <a href=\"/admin/summary\">"));

        let blank = Selection::new(Some("  "), Some(""), SortMode::ByName);
        let html = summary(&blank.apply(&records), &missions, &blank);
        assert!(!html.contains("필터 적용"));
    }

    #[test]
    fn query_string_keeps_filters() {
        let selection = Selection::new(Some("Kim Lee"), Some("2024-05"), SortMode::ByName);
        assert_eq!(query_string(&selection), "q=Kim+Lee&amp;date=2024-05&amp;sort=name");

        assert_eq!(query_string(&Selection::default()), "sort=time");
    }
}
