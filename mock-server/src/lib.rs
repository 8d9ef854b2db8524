use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub published: bool,
}

#[derive(Deserialize)]
pub struct CreateArticle {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub published: bool,
}

#[derive(Deserialize)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub body: Option<String>,
    pub published: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub article_id: Uuid,
    pub text: String,
}

#[derive(Deserialize)]
pub struct CreateComment {
    pub text: String,
}

#[derive(Default)]
pub struct Store {
    articles: HashMap<Uuid, Article>,
    comments: HashMap<Uuid, Vec<Comment>>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route(
            "/articles/{id}",
            get(get_article)
                .put(update_article)
                .patch(update_article)
                .delete(delete_article),
        )
        .route(
            "/articles/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_articles(State(db): State<Db>) -> Json<Vec<Article>> {
    let store = db.read().await;
    Json(store.articles.values().cloned().collect())
}

async fn create_article(
    State(db): State<Db>,
    Json(input): Json<CreateArticle>,
) -> (StatusCode, Json<Article>) {
    let article = Article {
        id: Uuid::new_v4(),
        title: input.title,
        body: input.body,
        published: input.published,
    };
    db.write().await.articles.insert(article.id, article.clone());
    (StatusCode::CREATED, Json(article))
}

async fn get_article(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Article>, StatusCode> {
    let store = db.read().await;
    store
        .articles
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_article(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateArticle>,
) -> Result<Json<Article>, StatusCode> {
    let mut store = db.write().await;
    let article = store.articles.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        article.title = title;
    }
    if let Some(body) = input.body {
        article.body = body;
    }
    if let Some(published) = input.published {
        article.published = published;
    }
    Ok(Json(article.clone()))
}

async fn delete_article(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.comments.remove(&id);
    store
        .articles
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_comments(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Comment>>, StatusCode> {
    let store = db.read().await;
    if !store.articles.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(store.comments.get(&id).cloned().unwrap_or_default()))
}

async fn create_comment(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateComment>,
) -> Result<(StatusCode, Json<Comment>), StatusCode> {
    let mut store = db.write().await;
    if !store.articles.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let comment = Comment {
        id: Uuid::new_v4(),
        article_id: id,
        text: input.text,
    };
    store.comments.entry(id).or_default().push(comment.clone());
    Ok((StatusCode::CREATED, Json(comment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_serializes_to_json() {
        let article = Article {
            id: Uuid::nil(),
            title: "Test".to_string(),
            body: "Body".to_string(),
            published: false,
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["title"], "Test");
        assert_eq!(json["published"], false);
    }

    #[test]
    fn create_article_defaults_optional_fields() {
        let input: CreateArticle = serde_json::from_str(r#"{"title":"Only title"}"#).unwrap();
        assert_eq!(input.title, "Only title");
        assert!(input.body.is_empty());
        assert!(!input.published);
    }

    #[test]
    fn create_article_rejects_missing_title() {
        let result: Result<CreateArticle, _> = serde_json::from_str(r#"{"body":"text"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_article_all_fields_optional() {
        let input: UpdateArticle = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.body.is_none());
        assert!(input.published.is_none());
    }

    #[test]
    fn comment_roundtrips_through_json() {
        let comment = Comment {
            id: Uuid::new_v4(),
            article_id: Uuid::new_v4(),
            text: "Nice".to_string(),
        };
        let json = serde_json::to_string(&comment).unwrap();
        let back: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, comment.id);
        assert_eq!(back.article_id, comment.article_id);
        assert_eq!(back.text, comment.text);
    }
}
