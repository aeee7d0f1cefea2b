//! Page rendering.
//!
//! Plain HTML string templates consuming a data object. The handlers treat
//! this module as a renderer only; no instrumentation or store access here.

use crate::store::Course;

/// A transient flash banner carried across a redirect.
pub struct Flash<'a> {
    pub message: &'a str,
    pub level: &'a str,
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn flash_banner(flash: Option<&Flash<'_>>) -> String {
    match flash {
        Some(f) => {
            let class = if f.level == "success" { "success" } else { "error" };
            format!(
                r#"<div class="flash {class}">{}</div>"#,
                escape(f.message)
            )
        }
        None => String::new(),
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title} - Course Catalog</title>
<style>
body {{ font-family: sans-serif; margin: 2em; }}
.flash.error {{ color: #a00; border: 1px solid #a00; padding: 0.5em; }}
.flash.success {{ color: #060; border: 1px solid #060; padding: 0.5em; }}
table {{ border-collapse: collapse; }}
td, th {{ border: 1px solid #ccc; padding: 0.4em 0.8em; }}
</style>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/catalog">Catalog</a> | <a href="/add_course">Add Course</a></nav>
{body}
</body>
</html>"#
    )
}

pub fn index(flash: Option<&Flash<'_>>) -> String {
    let banner = flash_banner(flash);
    page(
        "Home",
        &format!(
            "{banner}<h1>Course Catalog</h1>\n<p>Browse the <a href=\"/catalog\">course catalog</a> or <a href=\"/add_course\">add a course</a>.</p>"
        ),
    )
}

pub fn catalog(courses: &[Course], flash: Option<&Flash<'_>>) -> String {
    let banner = flash_banner(flash);
    let rows: String = courses
        .iter()
        .map(|c| {
            format!(
                "<tr><td><a href=\"/course/{code}\">{code}</a></td><td>{name}</td><td>{instructor}</td><td>{semester}</td></tr>\n",
                code = escape(&c.code),
                name = escape(&c.name),
                instructor = escape(&c.instructor),
                semester = escape(&c.semester),
            )
        })
        .collect();

    let table = if courses.is_empty() {
        "<p>No courses in the catalog yet.</p>".to_string()
    } else {
        format!(
            "<table><tr><th>Code</th><th>Name</th><th>Instructor</th><th>Semester</th></tr>\n{rows}</table>"
        )
    };

    page(
        "Catalog",
        &format!("{banner}<h1>Course Catalog ({} courses)</h1>\n{table}", courses.len()),
    )
}

pub fn add_course_form(flash: Option<&Flash<'_>>) -> String {
    let banner = flash_banner(flash);
    let fields: String = Course::FIELD_NAMES
        .iter()
        .map(|f| {
            format!(
                "<label>{f}: <input type=\"text\" name=\"{f}\"></label><br>\n"
            )
        })
        .collect();

    page(
        "Add Course",
        &format!(
            "{banner}<h1>Add Course</h1>\n<form method=\"post\" action=\"/add_course\">\n{fields}<button type=\"submit\">Add</button>\n</form>"
        ),
    )
}

pub fn course_details(course: &Course) -> String {
    let rows: String = Course::FIELD_NAMES
        .iter()
        .map(|f| {
            format!(
                "<tr><th>{f}</th><td>{}</td></tr>\n",
                escape(course.field(f).unwrap_or_default())
            )
        })
        .collect();

    page(
        &course.code,
        &format!(
            "<h1>{} — {}</h1>\n<table>{rows}</table>",
            escape(&course.code),
            escape(&course.name)
        ),
    )
}
