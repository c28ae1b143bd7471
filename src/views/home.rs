use askama::Template;
use axum::response::{Html, IntoResponse};
use axum_extra::extract::CookieJar;

use crate::notice::{self, Notice};
use crate::session::CurrentSession;
use crate::views::Viewer;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    notice: Option<Notice>,
    viewer: Option<Viewer>,
}

pub async fn index(CurrentSession(session): CurrentSession, jar: CookieJar) -> impl IntoResponse {
    let (jar, notice) = notice::take(jar);
    let template = HomeTemplate {
        notice,
        viewer: session.as_ref().map(|s| Viewer::from(&s.user)),
    };
    (jar, Html(template.render().unwrap_or_default()))
}
