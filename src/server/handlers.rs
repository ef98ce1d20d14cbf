//! Route handlers

use axum::{
    extract::{Path, Request, State},
    response::{Html, Redirect},
};
use tera::Context;

use super::{AppError, PostForm, SharedState};
use crate::content::slug;
use crate::templates::{FormData, PostData, PostSummary};

type HtmlResult = Result<Html<String>, AppError>;

/// Render a view or surface the render failure
fn render(state: &SharedState, view: &str, context: &Context) -> HtmlResult {
    Ok(Html(state.templates.render(view, context)?))
}

pub async fn home(State(state): State<SharedState>) -> HtmlResult {
    render(&state, "home", &Context::new())
}

pub async fn resume(State(state): State<SharedState>) -> HtmlResult {
    render(&state, "resume", &Context::new())
}

pub async fn list_posts(State(state): State<SharedState>) -> HtmlResult {
    let posts = state
        .store
        .list_published()
        .await
        .map_err(AppError::store("listing posts"))?;

    let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();
    let mut context = Context::new();
    context.insert("posts", &summaries);
    render(&state, "posts.index", &context)
}

pub async fn show_post(
    State(state): State<SharedState>,
    Path(post_slug): Path<String>,
) -> HtmlResult {
    let post = state
        .store
        .get_by_slug(&post_slug)
        .await
        .map_err(AppError::store("fetching post"))?;

    let mut context = Context::new();
    context.insert("post", &PostData::new(&post, &state.markdown));
    render(&state, "posts.show", &context)
}

pub async fn new_post(State(state): State<SharedState>) -> HtmlResult {
    let mut context = Context::new();
    context.insert("form", &FormData::blank());
    render(&state, "posts.new", &context)
}

pub async fn create_post(
    State(state): State<SharedState>,
    request: Request,
) -> Result<Redirect, AppError> {
    let form = PostForm::from_request(request).await?;

    let post_slug = slug::generate(&form.title);
    if post_slug.is_empty() {
        return Err(AppError::Validation(format!(
            "title {:?} does not produce a slug",
            form.title
        )));
    }

    let post = state
        .store
        .create(form.into_new_post(post_slug))
        .await
        .map_err(AppError::store("creating post"))?;

    tracing::info!("Created post {} ({})", post.id, post.slug);
    Ok(Redirect::to(&format!("/posts/{}", post.slug)))
}

pub async fn edit_post(
    State(state): State<SharedState>,
    Path(post_slug): Path<String>,
) -> HtmlResult {
    let post = state
        .store
        .get_by_slug(&post_slug)
        .await
        .map_err(AppError::store("fetching post"))?;

    let mut context = Context::new();
    context.insert("post", &PostData::new(&post, &state.markdown));
    context.insert("form", &FormData::for_post(&post));
    render(&state, "posts.edit", &context)
}

pub async fn update_post(
    State(state): State<SharedState>,
    Path(post_slug): Path<String>,
    request: Request,
) -> Result<Redirect, AppError> {
    let post = state
        .store
        .get_by_slug(&post_slug)
        .await
        .map_err(AppError::store("fetching post"))?;

    let form = PostForm::from_request(request).await?;

    let updated = state
        .store
        .update(post.id, form.into_update())
        .await
        .map_err(AppError::store("updating post"))?;

    tracing::info!("Updated post {} ({})", updated.id, updated.slug);
    Ok(Redirect::to(&format!("/posts/{}", updated.slug)))
}

pub async fn delete_post(
    State(state): State<SharedState>,
    Path(post_slug): Path<String>,
) -> Result<Redirect, AppError> {
    let post = state
        .store
        .get_by_slug(&post_slug)
        .await
        .map_err(AppError::store("fetching post"))?;

    state
        .store
        .delete(post.id)
        .await
        .map_err(AppError::store("deleting post"))?;

    tracing::info!("Deleted post {} ({})", post.id, post.slug);
    Ok(Redirect::to("/posts"))
}
