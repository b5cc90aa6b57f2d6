//! Lessons served over HTTP from a static site's `songs/` directory.

use async_trait::async_trait;
use lingo_core::model::{Lesson, LessonKey};
use reqwest::{Client, StatusCode};
use storage::lesson_file;
use storage::repository::{LessonRepository, StorageError};
use tracing::debug;
use url::Url;

use crate::error::LessonServiceError;

#[derive(Debug, Clone)]
pub struct HttpLessonRepository {
    client: Client,
    base: Url,
}

impl HttpLessonRepository {
    /// Repository rooted at `base_url`, e.g. `https://example.org/`.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::InvalidBaseUrl` if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, LessonServiceError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    /// Address of the lesson file for `key`.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::InvalidBaseUrl` if the key does not form a valid path.
    pub fn lesson_url(&self, key: &LessonKey) -> Result<Url, LessonServiceError> {
        Ok(self.base.join(&key.file_path())?)
    }

    async fn fetch(&self, key: &LessonKey) -> Result<String, LessonServiceError> {
        let url = self.lesson_url(key)?;
        debug!(%url, "fetching lesson");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(LessonServiceError::HttpStatus(response.status()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl LessonRepository for HttpLessonRepository {
    async fn get_lesson(&self, key: &LessonKey) -> Result<Lesson, StorageError> {
        if !key.is_path_safe() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let body = self.fetch(key).await.map_err(fetch_error)?;
        lesson_file::decode(&body)
    }

    async fn save_lesson(&self, _key: &LessonKey, _lesson: &Lesson) -> Result<(), StorageError> {
        Err(StorageError::ReadOnly)
    }
}

/// A missing file is `NotFound`; every other fetch failure is a connection error.
fn fetch_error(err: LessonServiceError) -> StorageError {
    match err {
        LessonServiceError::HttpStatus(StatusCode::NOT_FOUND) => StorageError::NotFound,
        err => StorageError::Connection(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `response` verbatim to every connection on a local port.
    async fn serve(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut request = [0_u8; 2048];
                let _ = stream.read(&mut request).await;
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{addr}/")
    }

    #[test]
    fn only_404_maps_to_not_found() {
        assert!(matches!(
            fetch_error(LessonServiceError::HttpStatus(StatusCode::NOT_FOUND)),
            StorageError::NotFound
        ));
        assert!(matches!(
            fetch_error(LessonServiceError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR)),
            StorageError::Connection(_)
        ));
    }

    #[tokio::test]
    async fn missing_lesson_is_not_found() {
        let base = serve("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let repo = HttpLessonRepository::new(&base).unwrap();
        let err = repo.get_lesson(&LessonKey::new("absent")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound), "{err}");
    }

    #[tokio::test]
    async fn server_error_is_a_connection_error() {
        let base = serve(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let repo = HttpLessonRepository::new(&base).unwrap();
        let err = repo.get_lesson(&LessonKey::new("jamini")).await.unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)), "{err}");
    }

    #[tokio::test]
    async fn served_lesson_is_decoded() {
        const BODY: &str = r#"{"name":"Demo","videoId":"abc","song":[{"BN":"a","EN":"a","correctOrder":["x"],"start":0,"end":"0:02"}]}"#;
        let response: &'static str = Box::leak(
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{BODY}",
                BODY.len()
            )
            .into_boxed_str(),
        );
        let repo = HttpLessonRepository::new(&serve(response).await).unwrap();
        let lesson = repo.get_lesson(&LessonKey::new("demo")).await.unwrap();
        assert_eq!(lesson.name(), "Demo");
        assert_eq!(lesson.line_count(), 1);
    }

    #[tokio::test]
    async fn path_like_keys_are_not_fetched() {
        let repo = HttpLessonRepository::new("http://127.0.0.1:9/").unwrap();
        let err = repo.get_lesson(&LessonKey::new("../admin")).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[test]
    fn lesson_url_appends_songs_path() {
        let repo = HttpLessonRepository::new("https://lyrics.example/app").unwrap();
        let url = repo.lesson_url(&LessonKey::new("jamini")).unwrap();
        assert_eq!(url.as_str(), "https://lyrics.example/app/songs/jamini.json");
    }

    #[test]
    fn rejects_relative_base() {
        assert!(matches!(
            HttpLessonRepository::new("songs"),
            Err(LessonServiceError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn saving_is_refused() {
        let repo = HttpLessonRepository::new("https://lyrics.example/").unwrap();
        let lesson = storage::demo::demo_lesson().unwrap();
        let err = repo
            .save_lesson(&LessonKey::new("jamini"), &lesson)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ReadOnly));
    }
}
