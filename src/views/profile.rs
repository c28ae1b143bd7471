use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum_extra::extract::CookieJar;

use crate::capability::Capability;
use crate::notice::{self, Notice};
use crate::session::RequireSession;
use crate::state::SharedState;
use crate::views::Viewer;

#[derive(Template)]
#[template(path = "profile/show.html")]
struct ProfileTemplate {
    notice: Option<Notice>,
    viewer: Viewer,
    image: String,
    manage_all_posts: bool,
    min_password_length: usize,
}

pub async fn show(
    State(state): State<SharedState>,
    RequireSession(session): RequireSession,
    jar: CookieJar,
) -> impl IntoResponse {
    let manage_all_posts = state
        .capabilities
        .has_capability(&session, Capability::ManageAllPosts)
        .await;

    let (jar, notice) = notice::take(jar);
    let template = ProfileTemplate {
        notice,
        viewer: Viewer::from(&session.user),
        image: session.user.avatar().unwrap_or_default().to_string(),
        manage_all_posts,
        min_password_length: state.config.min_password_length,
    };
    (jar, Html(template.render().unwrap_or_default()))
}
