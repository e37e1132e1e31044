//! Server-rendered HTML pages.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use chrono::Datelike;
use schedule_core::{Lesson, LessonQuery, ScheduleDocument};

use crate::server::AppState;

const SITE_NAME: &str = "SmartSchedule";

struct TeamMember {
    name: &'static str,
    role: &'static str,
    description: &'static str,
}

const TEAM: [TeamMember; 4] = [
    TeamMember {
        name: "Алексей Иванов",
        role: "Team Lead / Backend",
        description: "Координация проекта, архитектура, серверная часть",
    },
    TeamMember {
        name: "Мария Петрова",
        role: "Frontend Developer",
        description: "Вёрстка, адаптивный дизайн, CSS/HTML",
    },
    TeamMember {
        name: "Дмитрий Сидоров",
        role: "JavaScript Developer",
        description: "Интерактивность, формы, AJAX запросы",
    },
    TeamMember {
        name: "Екатерина Кузнецова",
        role: "UI/UX Designer",
        description: "Дизайн, иконки, пользовательский опыт",
    },
];

/// (name, icon class)
const TECHNOLOGIES: [(&str, &str); 6] = [
    ("Rust", "fab fa-rust"),
    ("axum", "fas fa-server"),
    ("HTML5", "fab fa-html5"),
    ("CSS3", "fab fa-css3-alt"),
    ("JavaScript", "fab fa-js"),
    ("JSON", "fas fa-database"),
];

/// Escapes text for use in HTML content and attribute values.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn layout(title: &str, body: &str) -> Html<String> {
    let year = chrono::Local::now().year();
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
<header>
<nav>
<a href="/" class="logo">{SITE_NAME}</a>
<a href="/schedule">Расписание</a>
<a href="/add-event">Добавить пару</a>
<a href="/about">О проекте</a>
</nav>
</header>
<main>
{body}
</main>
<footer>&copy; {year} {SITE_NAME}</footer>
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn options<'a>(values: impl IntoIterator<Item = &'a str>, selected: Option<&str>) -> String {
    let mut out = String::new();
    for value in values {
        let mark = if selected == Some(value) { " selected" } else { "" };
        let value = escape(value);
        let _ = writeln!(out, r#"<option value="{value}"{mark}>{value}</option>"#);
    }
    out
}

const CURRENT_LESSON_SCRIPT: &str = r#"<script>
fetch('/api/current-lesson')
  .then((response) => response.json())
  .then((data) => {
    const section = document.getElementById('current-lesson');
    const lesson = data.current_lesson;
    if (!lesson) {
      section.textContent = 'Сейчас пар нет';
      return;
    }
    const title = document.createElement('h2');
    title.textContent = `Сейчас (${data.current_time}): ${lesson.subject}`;
    const details = document.createElement('p');
    details.textContent = `${lesson.group} · ${lesson.teacher} · ауд. ${lesson.room}`;
    section.replaceChildren(title, details);
  })
  .catch(() => {});
</script>"#;

pub(crate) async fn index() -> Html<String> {
    layout(
        "SmartSchedule - Умное расписание",
        &format!(
            r#"<section class="hero">
<h1>Электронное расписание колледжа</h1>
<p>Актуальные пары для каждой группы, поиск по преподавателю и аудитории.</p>
<a class="button" href="/schedule">Открыть расписание</a>
</section>
<section id="current-lesson" class="current-lesson"></section>
{CURRENT_LESSON_SCRIPT}"#
        ),
    )
}

pub(crate) async fn about() -> Html<String> {
    let mut body = String::from("<h1>О проекте</h1>\n<section class=\"team\">\n");
    for member in &TEAM {
        let _ = writeln!(
            body,
            "<article><h3>{}</h3><p class=\"role\">{}</p><p>{}</p></article>",
            escape(member.name),
            escape(member.role),
            escape(member.description),
        );
    }
    body.push_str("</section>\n<ul class=\"technologies\">\n");
    for (name, icon) in TECHNOLOGIES {
        let _ = writeln!(
            body,
            "<li><i class=\"{}\"></i> {}</li>",
            escape(icon),
            escape(name)
        );
    }
    body.push_str("</ul>");

    layout("О проекте - SmartSchedule", &body)
}

fn lesson_cell(lesson: &Lesson) -> String {
    format!(
        "<div class=\"lesson\" data-id=\"{id}\"><strong>{subject}</strong><br>{teacher}<br>ауд. {room} · {kind}</div>",
        id = lesson.id,
        subject = escape(&lesson.subject),
        teacher = escape(&lesson.teacher),
        room = escape(&lesson.room),
        kind = escape(&lesson.kind),
    )
}

fn schedule_grid(document: &ScheduleDocument, query: &LessonQuery) -> String {
    let lessons = document.query(query);

    let mut table = String::from("<table id=\"schedule-table\">\n<thead><tr><th>Время</th>");
    for day in &document.days {
        let _ = write!(table, "<th>{}</th>", escape(day));
    }
    table.push_str("</tr></thead>\n<tbody>\n");

    for slot in &document.time_slots {
        let _ = write!(
            table,
            "<tr><td class=\"time\">{}</td>",
            escape(document.time_slot_label(slot.id))
        );
        for day in &document.days {
            table.push_str("<td>");
            for lesson in lessons
                .iter()
                .filter(|l| &l.day == day && l.time_slot == slot.id)
            {
                table.push_str(&lesson_cell(lesson));
            }
            table.push_str("</td>");
        }
        table.push_str("</tr>\n");
    }
    table.push_str("</tbody>\n</table>");
    table
}

pub(crate) async fn schedule(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LessonQuery>,
) -> Html<String> {
    let document = state.schedule.document().await;

    let mut body = String::from("<h1>Расписание</h1>\n<form class=\"filters\" method=\"get\">\n");
    let _ = write!(
        body,
        "<select id=\"group-filter\" name=\"group\"><option value=\"\">Все группы</option>\n{}</select>\n",
        options(document.groups.iter().map(String::as_str), query.group.as_deref())
    );
    let _ = write!(
        body,
        "<select id=\"day-filter\" name=\"day\"><option value=\"\">Все дни</option>\n{}</select>\n",
        options(document.days.iter().map(String::as_str), query.day.as_deref())
    );
    let _ = write!(
        body,
        "<input id=\"teacher-filter\" name=\"teacher\" placeholder=\"Преподаватель\" value=\"{}\">\n",
        escape(query.teacher.as_deref().unwrap_or(""))
    );
    let _ = write!(
        body,
        "<input id=\"room-filter\" name=\"room\" placeholder=\"Аудитория\" value=\"{}\">\n",
        escape(query.room.as_deref().unwrap_or(""))
    );
    body.push_str("<button type=\"submit\">Показать</button>\n</form>\n");
    body.push_str(&schedule_grid(&document, &query));

    layout("Расписание - SmartSchedule", &body)
}

const ADD_EVENT_SCRIPT: &str = r#"<script>
document.getElementById('add-event-form').addEventListener('submit', async (event) => {
  event.preventDefault();
  const form = new FormData(event.target);
  const response = await fetch('/api/schedule', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(Object.fromEntries(form.entries())),
  });
  const result = await response.json();
  document.getElementById('form-result').textContent = result.message;
  if (result.success) event.target.reset();
});
</script>"#;

pub(crate) async fn add_event(State(state): State<Arc<AppState>>) -> Html<String> {
    let document = state.schedule.document().await;

    let mut slots = String::new();
    for slot in &document.time_slots {
        let _ = writeln!(
            slots,
            "<option value=\"{}\">{}</option>",
            slot.id,
            escape(&slot.time)
        );
    }

    let body = format!(
        r#"<h1>Добавить пару</h1>
<form id="add-event-form">
<label>Группа <input name="group" list="group-list" required></label>
<datalist id="group-list">
{groups}</datalist>
<label>День <select name="day">
{days}</select></label>
<label>Время <select name="time_slot">
{slots}</select></label>
<label>Предмет <input name="subject" required></label>
<label>Преподаватель <input name="teacher" required></label>
<label>Аудитория <input name="room"></label>
<label>Тип <select name="type">
<option value="лекция">лекция</option>
<option value="практика">практика</option>
<option value="лабораторная">лабораторная</option>
</select></label>
<button type="submit">Сохранить</button>
</form>
<p id="form-result"></p>
{ADD_EVENT_SCRIPT}"#,
        groups = options(document.groups.iter().map(String::as_str), None),
        days = options(document.days.iter().map(String::as_str), None),
    );

    layout("Добавить пару - SmartSchedule", &body)
}
