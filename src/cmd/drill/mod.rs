// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use flashdeck_core::CardId;
    use flashdeck_core::Flashcard;
    use flashdeck_core::Scope;
    use flashdeck_core::Timestamp;
    use flashdeck_core::error::Fallible;
    use flashdeck_core::repository::Repository;
    use portpicker::pick_unused_port;
    use reqwest::StatusCode;
    use tempfile::tempdir;
    use tokio::spawn;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    use crate::cmd::drill::server::ServerConfig;
    use crate::cmd::drill::server::start_server;
    use crate::cmd::init::init_collection;
    use crate::collection::Collection;
    use crate::helper::create_tmp_collection;
    use crate::utils::wait_for_server;

    const TEST_HOST: &str = "127.0.0.1";

    fn test_config(directory: String, port: u16, card_limit: Option<usize>) -> ServerConfig {
        ServerConfig {
            directory: Some(directory),
            host: Some(TEST_HOST.to_string()),
            port: Some(port),
            session_started_at: Timestamp::now(),
            card_limit,
            deck_filter: None,
            scope: Scope::Due,
            open_browser: Some(false),
        }
    }

    async fn start_with_handle(
        card_limit: Option<usize>,
    ) -> Fallible<(String, u16, JoinHandle<Fallible<()>>)> {
        let port = pick_unused_port().unwrap();
        let directory = create_tmp_collection()?;
        let config = test_config(directory.clone(), port, card_limit);
        let handle = spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;
        Ok((directory, port, handle))
    }

    async fn start(card_limit: Option<usize>) -> Fallible<(String, u16)> {
        let (directory, port, _) = start_with_handle(card_limit).await?;
        Ok((directory, port))
    }

    /// Post `Shutdown` without following the redirect, since the server is
    /// going away.
    async fn shutdown(port: u16) {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();
        let response = client
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Shutdown")])
            .send()
            .await
            .unwrap();
        assert!(response.status().is_redirection());
    }

    async fn act(port: u16, action: &str) -> Fallible<String> {
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", action)])
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        Ok(response.text().await.unwrap())
    }

    fn stored_card(directory: &str, id: u32) -> Fallible<Flashcard> {
        let collection = Collection::new(Some(directory.to_string()))?;
        let card: Option<Flashcard> = collection.db.get(CardId::new(id))?;
        Ok(card.unwrap())
    }

    #[tokio::test]
    async fn test_start_server_on_non_existent_directory() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let config = test_config("./derpherp".to_string(), port, None);
        let result = start_server(config).await;
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_with_no_cards_due() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let dir = tempdir()?;
        let path = dir.path().display().to_string();
        init_collection(Some(path.clone()), true)?;
        start_server(test_config(path, port, None)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e() -> Fallible<()> {
        let (directory, port) = start(Some(2)).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/style.css"))
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the `script.js` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/script.js"))
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // Hit the not found endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/herp-derp"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the root endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/"))
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await.unwrap();
        assert!(html.contains("What is the capital of France?"));
        assert!(html.contains("Difficulty: 1/5"));
        assert!(!html.contains("Paris"));

        let html = act(port, "Reveal").await?;
        assert!(html.contains("Paris"));

        let html = act(port, "Know").await?;
        assert!(html.contains("What is the powerhouse of the cell?"));
        assert!(!html.contains("Mitochondria"));

        let html = act(port, "Reveal").await?;
        assert!(html.contains("Mitochondria"));

        let html = act(port, "Don't Know").await?;
        assert!(html.contains("Session Completed"));

        // Both answers were written through to the database.
        let first = stored_card(&directory, 1)?;
        assert_eq!(first.repetitions, 4);
        assert_eq!(first.difficulty.value(), 1);
        assert!(first.last_reviewed.is_some());
        let second = stored_card(&directory, 2)?;
        assert_eq!(second.repetitions, 0);
        assert_eq!(second.difficulty.value(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_undo() -> Fallible<()> {
        let (directory, port) = start(None).await?;

        act(port, "Reveal").await?;
        act(port, "Don't Know").await?;
        assert_eq!(stored_card(&directory, 1)?.repetitions, 0);

        let html = act(port, "Undo").await?;
        assert!(html.contains("What is the capital of France?"));
        assert!(!html.contains("Paris"));
        assert_eq!(stored_card(&directory, 1)?.repetitions, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_undo_initial() -> Fallible<()> {
        let (_, port) = start(None).await?;
        let html = act(port, "Undo").await?;
        assert!(html.contains("What is the capital of France?"));
        Ok(())
    }

    #[tokio::test]
    async fn test_answer_without_reveal() -> Fallible<()> {
        let (directory, port) = start(None).await?;
        let html = act(port, "Know").await?;
        assert!(html.contains("What is the capital of France?"));
        assert_eq!(stored_card(&directory, 1)?.repetitions, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_skip() -> Fallible<()> {
        let (_, port) = start(None).await?;
        let html = act(port, "Skip").await?;
        assert!(html.contains("What is the powerhouse of the cell?"));
        Ok(())
    }

    #[tokio::test]
    async fn test_end() -> Fallible<()> {
        let (_, port) = start(None).await?;
        let html = act(port, "End").await?;
        assert!(html.contains("Session Completed"));
        assert!(html.contains("Cards Reviewed"));
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_before_finishing_is_an_error() -> Fallible<()> {
        let (_, port, handle) = start_with_handle(None).await?;
        act(port, "Reveal").await?;
        act(port, "Know").await?;
        shutdown(port).await;
        let result = timeout(Duration::from_secs(10), handle)
            .await
            .unwrap()
            .unwrap();
        let err = result.unwrap_err();
        assert_eq!(err.message(), "Session interrupted before completion");
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_after_finishing() -> Fallible<()> {
        let (directory, port, handle) = start_with_handle(Some(1)).await?;
        act(port, "Reveal").await?;
        let html = act(port, "Know").await?;
        assert!(html.contains("Session Completed"));
        shutdown(port).await;
        let result = timeout(Duration::from_secs(10), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
        assert_eq!(stored_card(&directory, 1)?.repetitions, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_action_is_rejected() -> Fallible<()> {
        let (_, port) = start(None).await?;
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Maybe")])
            .send()
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        Ok(())
    }
}
