//! Command execution against a [`SessionStore`].

use serde_json::{json, Value};
use thiserror::Error;

use crate::api::Credentials;
use crate::cli::Command;
use crate::error::SessionError;
use crate::session::SessionStore;

/// Environment variable consulted when `login` is run without `--password`.
pub const PASSWORD_ENV: &str = "USER_SESSION_PASSWORD";

/// Errors from running a command.
#[derive(Error, Debug)]
pub enum CommandError {
    /// No password given on the command line or in the environment.
    #[error("no password given; pass --password or set USER_SESSION_PASSWORD")]
    MissingPassword,

    /// The store action failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Run `command` and return its JSON output.
pub async fn execute(store: &SessionStore, command: Command) -> Result<Value, CommandError> {
    let output = match command {
        Command::Login { email, password } => {
            let password = password
                .or_else(|| std::env::var(PASSWORD_ENV).ok())
                .ok_or(CommandError::MissingPassword)?;
            let login = store
                .login_user(&Credentials::new(email, password))
                .await?;
            json!({
                "state": store.state(),
                "status": login.status,
                "user": login.user,
            })
        }
        Command::Logout => {
            store.logout().await;
            json!({ "state": store.state() })
        }
        Command::Status => {
            let state = store.fetch_user_on_load().await;
            json!({ "state": state, "user": store.get_user() })
        }
        Command::Verify => {
            let valid = store.verify_token().await;
            json!({ "valid": valid, "state": store.state() })
        }
        Command::Whoami => json!({ "state": store.state(), "user": store.get_user() }),
        Command::List(pagination) => {
            let users = store.fetch_users(pagination).await?;
            json!({
                "page": pagination.page,
                "limit": pagination.limit,
                "data": users,
            })
        }
        Command::Show(id) => store.fetch_user_by_id(&id).await?.into_value(),
        Command::Add(record) => store.add_user(&record).await?,
        Command::Update(id, record) => store.update_user(&id, &record).await?,
        Command::Delete(id) => store.delete_user(&id).await?,
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::api::fake::{Call, Endpoint, FakeApi};
    use crate::api::{Pagination, UserId, UserRecord};
    use crate::storage::MemoryStore;

    fn setup() -> (Arc<FakeApi>, SessionStore) {
        let api = Arc::new(FakeApi::new());
        let store = SessionStore::new(api.clone(), Arc::new(MemoryStore::new()));
        (api, store)
    }

    #[tokio::test]
    async fn test_login_output_omits_token() {
        let (api, store) = setup();
        api.push_ok(Endpoint::Login, json!({"user": {"id": 1}, "token": "T1"}));

        let output = execute(
            &store,
            Command::Login {
                email: "a@example.com".into(),
                password: Some("secret".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(output["state"], "authenticated");
        assert_eq!(output["user"], json!({"id": 1}));
        assert!(output.get("token").is_none());
    }

    #[tokio::test]
    async fn test_whoami_makes_no_request() {
        let (api, store) = setup();

        let output = execute(&store, Command::Whoami).await.unwrap();
        assert_eq!(output["state"], "anonymous");
        assert_eq!(output["user"], json!({}));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_list_output() {
        let (api, store) = setup();
        api.push_ok(Endpoint::List, json!({"data": [{"id": 1}]}));

        let output = execute(&store, Command::List(Pagination::new(2, 5)))
            .await
            .unwrap();
        assert_eq!(output["page"], 2);
        assert_eq!(output["limit"], 5);
        assert_eq!(output["data"], json!([{"id": 1}]));
        assert_eq!(api.calls(), vec![Call::List(Pagination::new(2, 5))]);
    }

    #[tokio::test]
    async fn test_delete_passes_body_through() {
        let (api, store) = setup();
        api.push_ok(Endpoint::Delete, json!({"message": "User deleted"}));

        let output = execute(&store, Command::Delete(UserId::from(4)))
            .await
            .unwrap();
        assert_eq!(output["message"], "User deleted");
    }

    #[tokio::test]
    async fn test_failure_propagates_session_error() {
        let (_api, store) = setup();

        let err = execute(&store, Command::Add(UserRecord::default()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Session(SessionError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_without_session() {
        let (_api, store) = setup();

        let output = execute(&store, Command::Verify).await.unwrap();
        assert_eq!(output["valid"], false);
    }
}
