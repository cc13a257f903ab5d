//! HTML rendering of the list and detail pages.
//!
//! Pages are self-contained documents with inline CSS; the GPA chart is an
//! inline SVG so the pages work without any script.

use crate::views::{
    format_gpa, ChartBar, CourseLink, CourseRow, DetailPage, DetailView, InstructorRow, ListPage,
    RequirementGroupView,
};

const TITLE: &str = "CS Degree Planner";
const BAR_COLOR: &str = "#2196f3";

pub fn render_list_page(page: &ListPage) -> String {
    let body = match page {
        ListPage::Loaded(rows) if rows.is_empty() => no_data("No courses found."),
        ListPage::Loaded(rows) => render_course_table(rows),
        ListPage::Failed(message) => no_data(message),
    };

    let main = format!(
        r#"<div class="container">
        <div class="table-container">
            <div class="table-header">
                <h3>Courses ({count} courses)</h3>
            </div>
            {body}
        </div>
    </div>"#,
        count = page.course_count(),
    );
    document(TITLE, "", &main)
}

pub fn render_detail_page(page: &DetailPage) -> String {
    match page {
        DetailPage::Loaded(view) => {
            let header_extra =
                r#"<a href="/" class="back-btn-header">&larr; Back to Courses</a>"#;
            let title = format!("{}: {} - {}", view.code, view.name, TITLE);
            document(&title, header_extra, &render_detail(view))
        }
        DetailPage::NotFound => render_detail_error("Course not found"),
        DetailPage::Failed(message) => render_detail_error(message),
    }
}

fn render_detail_error(message: &str) -> String {
    let main = format!(
        r#"<div class="error-message">{message}</div>
    <a href="/" class="back-btn">Back to Courses</a>"#,
        message = html_escape(message),
    );
    document(TITLE, "", &main)
}

fn document(title: &str, header_extra: &str, main: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
<div class="App">
    <header class="App-header">
        <h1>{heading}</h1>
        {header_extra}
    </header>
    <main class="App-main">
    {main}
    </main>
</div>
</body>
</html>"#,
        title = html_escape(title),
        css = inline_css(),
        heading = TITLE,
    )
}

fn no_data(message: &str) -> String {
    format!(
        r#"<div class="no-data-message">{}</div>"#,
        html_escape(message)
    )
}

fn render_course_table(rows: &[CourseRow]) -> String {
    let rows: String = rows
        .iter()
        .map(|row| {
            format!(
                r#"<tr class="course-row">
    <td class="course-code"><a href="{href}">{code}</a></td>
    <td class="course-name"><a href="{href}">{name}</a></td>
    <td class="course-credits">{credits}</td>
    <td class="course-gpa">{gpa}</td>
</tr>"#,
                href = html_escape(&row.link.href),
                code = html_escape(&row.link.code),
                name = html_escape(&row.name),
                credits = html_escape(&row.credit_hours),
                gpa = html_escape(&row.gpa),
            )
        })
        .collect();

    format!(
        r#"<table class="courses-table">
    <thead>
        <tr>
            <th>Course Code</th>
            <th>Course Name</th>
            <th>Credit Hours</th>
            <th>GPA</th>
        </tr>
    </thead>
    <tbody>
{rows}
    </tbody>
</table>"#
    )
}

fn render_detail(view: &DetailView) -> String {
    let instructors = if view.instructors.is_empty() {
        no_data("No instructor data available for this course.")
    } else {
        format!(
            r#"<div class="chart-container">{chart}</div>
            <div class="table-container">
                <h3>Instructor Details</h3>
                {table}
            </div>"#,
            chart = render_gpa_chart(&view.chart),
            table = render_instructor_table(&view.instructors),
        )
    };

    let prerequisites = if view.requirement_groups.is_empty() {
        no_data("No prerequisites required for this course.")
    } else {
        format!(
            r#"<div class="prerequisite-container">{}</div>"#,
            view.requirement_groups
                .iter()
                .map(render_requirement_group)
                .collect::<String>()
        )
    };

    let concurrent = if view.concurrent.is_empty() {
        no_data("No concurrent enrollment options available for this course.")
    } else {
        format!(
            r#"<div class="concurrent-container">
                <p class="info-text">This course can be taken concurrently with:</p>
                {}
            </div>"#,
            course_tags(&view.concurrent)
        )
    };

    format!(
        r#"<section class="section">
        <div class="course-header">
            <h2>{code}: {name}</h2>
            <div class="course-meta">
                <span class="meta-item">Credit Hours: {credits}</span>
                <span class="meta-item">Average GPA: {gpa}</span>
            </div>
        </div>
    </section>
    <section class="section">
        <h2>Instructor GPA Breakdown</h2>
        {instructors}
    </section>
    <section class="section">
        <h2>Prerequisites</h2>
        {prerequisites}
    </section>
    <section class="section">
        <h2>Concurrent Enrollment</h2>
        {concurrent}
    </section>"#,
        code = html_escape(&view.code),
        name = html_escape(&view.name),
        credits = html_escape(&view.credit_hours),
        gpa = html_escape(&view.avg_gpa),
    )
}

fn render_instructor_table(rows: &[InstructorRow]) -> String {
    let body: String = rows
        .iter()
        .map(|row| {
            let percentages: String = row
                .percentages
                .iter()
                .map(|pct| format!("<td>{}</td>", html_escape(pct)))
                .collect();
            format!(
                r#"<tr>
    <td>{name}</td>
    <td class="gpa-cell">{gpa}</td>
    <td>{students}</td>
    {percentages}
</tr>"#,
                name = html_escape(&row.name),
                gpa = html_escape(&row.gpa),
                students = html_escape(&row.total_students),
            )
        })
        .collect();

    format!(
        r#"<table class="instructor-table">
    <thead>
        <tr>
            <th>Instructor</th>
            <th>GPA</th>
            <th>Total Students</th>
            <th>% A</th>
            <th>% B</th>
            <th>% C</th>
            <th>% D</th>
            <th>% F</th>
        </tr>
    </thead>
    <tbody>
{body}
    </tbody>
</table>"#
    )
}

fn render_requirement_group(group: &RequirementGroupView) -> String {
    let separator = if group.and_follows {
        r#"<div class="prerequisite-separator"><span class="and-text">AND</span></div>"#
    } else {
        ""
    };
    format!(
        r#"<div class="prerequisite-group">
    <h3>{heading}</h3>
    <p class="prerequisite-explanation">{explanation}</p>
    {tags}
    {separator}
</div>"#,
        heading = group.heading,
        explanation = group.explanation,
        tags = course_tags(&group.courses),
    )
}

fn course_tags(links: &[CourseLink]) -> String {
    let tags: String = links
        .iter()
        .map(|link| {
            format!(
                r#"<a class="course-tag" href="{}">{}</a>"#,
                html_escape(&link.href),
                html_escape(&link.code)
            )
        })
        .collect();
    format!(r#"<div class="course-tags">{tags}</div>"#)
}

// Chart geometry, in SVG user units.
const CHART_WIDTH: f64 = 760.0;
const CHART_HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 110.0;
const GPA_MAX: f64 = 4.0;

/// Vertical bar chart of instructor GPAs on a fixed 0 to 4 scale.
pub fn render_gpa_chart(bars: &[ChartBar]) -> String {
    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_height;
    let y_of = |gpa: f64| baseline - gpa.clamp(0.0, GPA_MAX) / GPA_MAX * plot_height;

    let mut svg = format!(
        r#"<svg class="gpa-chart" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" role="img" aria-label="Instructor GPA chart">"#
    );

    for tick in 0..=4 {
        let value = f64::from(tick);
        let y = y_of(value);
        svg.push_str(&format!(
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#e0e0e0" stroke-dasharray="3 3"/><text x="{tx:.1}" y="{ty:.1}" text-anchor="end" font-size="12">{value:.1}</text>"##,
            x2 = CHART_WIDTH - MARGIN_RIGHT,
            tx = MARGIN_LEFT - 8.0,
            ty = y + 4.0,
        ));
    }
    svg.push_str(&format!(
        r#"<text x="16" y="{y:.1}" transform="rotate(-90 16 {y:.1})" text-anchor="middle" font-size="13">GPA</text>"#,
        y = MARGIN_TOP + plot_height / 2.0,
    ));

    if !bars.is_empty() {
        let band = plot_width / bars.len() as f64;
        let bar_width = band * 0.7;
        for (i, bar) in bars.iter().enumerate() {
            let center = MARGIN_LEFT + band * (i as f64 + 0.5);
            let top = y_of(bar.gpa);
            let label = html_escape(&bar.label);
            svg.push_str(&format!(
                r#"<rect class="gpa-bar" x="{x:.1}" y="{top:.1}" width="{bar_width:.1}" height="{h:.1}" fill="{BAR_COLOR}"><title>Instructor: {label}&#10;GPA: {gpa}</title></rect>"#,
                x = center - bar_width / 2.0,
                h = baseline - top,
                gpa = format_gpa(Some(bar.gpa)),
            ));
            svg.push_str(&format!(
                r#"<text x="{center:.1}" y="{ly:.1}" transform="rotate(-45 {center:.1} {ly:.1})" text-anchor="end" font-size="12">{label}</text>"#,
                ly = baseline + 14.0,
            ));
        }
    }

    svg.push_str(&format!(
        r##"<line x1="{MARGIN_LEFT}" y1="{baseline:.1}" x2="{x2:.1}" y2="{baseline:.1}" stroke="#666"/>"##,
        x2 = CHART_WIDTH - MARGIN_RIGHT,
    ));
    svg.push_str(&format!(
        r#"<rect x="{lx:.1}" y="4" width="12" height="12" fill="{BAR_COLOR}"/><text x="{tx:.1}" y="14" font-size="12">GPA</text>"#,
        lx = CHART_WIDTH - MARGIN_RIGHT - 60.0,
        tx = CHART_WIDTH - MARGIN_RIGHT - 44.0,
    ));
    svg.push_str("</svg>");
    svg
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; line-height: 1.6; color: #1f2937; background: #f5f7fa; }
a { color: inherit; }
.App-header { display: flex; align-items: center; justify-content: space-between; padding: 1.25rem 2rem; background: #1e3a5f; color: #fff; }
.App-header h1 { font-size: 1.75rem; }
.back-btn-header, .back-btn { display: inline-block; padding: 0.5rem 1rem; border-radius: 0.375rem; text-decoration: none; }
.back-btn-header { background: rgba(255,255,255,0.15); color: #fff; }
.back-btn { margin-top: 1rem; background: #2196f3; color: #fff; }
.App-main { max-width: 1200px; margin: 0 auto; padding: 2rem; }
.section, .table-container { background: #fff; border-radius: 0.5rem; padding: 1.5rem; margin-bottom: 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
.section h2 { margin-bottom: 1rem; }
.table-header h3 { margin-bottom: 1rem; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 0.6rem 0.75rem; border-bottom: 1px solid #e5e7eb; }
th { background: #f9fafb; font-weight: 600; }
.course-row:hover { background: #eef6ff; }
.course-row a { text-decoration: none; display: block; }
.course-code { font-family: ui-monospace, monospace; font-weight: 600; }
.gpa-cell, .course-gpa { font-weight: 600; }
.course-meta { display: flex; gap: 1.5rem; color: #4b5563; }
.chart-container { margin-bottom: 1.5rem; }
.gpa-chart { width: 100%; height: auto; }
.gpa-bar:hover { opacity: 0.8; }
.prerequisite-group h3 { font-size: 1rem; }
.prerequisite-explanation, .info-text { color: #6b7280; font-size: 0.875rem; margin-bottom: 0.5rem; }
.course-tags { display: flex; flex-wrap: wrap; gap: 0.5rem; }
.course-tag { padding: 0.25rem 0.75rem; border-radius: 999px; background: #e3f2fd; color: #1565c0; text-decoration: none; font-weight: 600; }
.course-tag:hover { background: #bbdefb; }
.prerequisite-separator { text-align: center; margin: 1rem 0; }
.and-text { padding: 0.2rem 0.8rem; border-radius: 0.25rem; background: #fff3e0; color: #e65100; font-weight: 700; }
.no-data-message, .error-message { padding: 1.5rem; text-align: center; color: #6b7280; }
.error-message { color: #b91c1c; }
"#
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
