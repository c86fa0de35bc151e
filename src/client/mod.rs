//! HTTP client for the habitrack API, used by the CLI commands.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

use crate::api::{ErrorBody, HabitDto, ProgressDto, TokenResponse, UserDto};

mod token_file;

pub use token_file::TokenFile;

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CreateHabitBody<'a> {
    name: &'a str,
    category: Option<&'a str>,
    target_per_day: i32,
}

#[derive(Serialize)]
struct UpdateHabitBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_per_day: Option<i32>,
}

#[derive(Serialize)]
struct CreateProgressBody {
    habit_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_tracked: Option<NaiveDate>,
    amount_done: i32,
}

/// Changes requested for a habit. `None` fields are left untouched
/// server-side.
#[derive(Debug, Default, Clone)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub target_per_day: Option<i32>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserDto> {
        let response = self
            .client
            .post(self.url("/register"))
            .json(&RegisterBody {
                username,
                email,
                password,
            })
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Login uses a form-encoded body, unlike the JSON endpoints.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let response = self
            .client
            .post(self.url("/login"))
            .form(&LoginForm { username, password })
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn create_habit(
        &self,
        token: &str,
        name: &str,
        category: Option<&str>,
        target_per_day: i32,
    ) -> Result<HabitDto> {
        let response = self
            .client
            .post(self.url("/habits"))
            .bearer_auth(token)
            .json(&CreateHabitBody {
                name,
                category,
                target_per_day,
            })
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn list_habits(&self, token: &str) -> Result<Vec<HabitDto>> {
        let response = self
            .client
            .get(self.url("/habits"))
            .bearer_auth(token)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn get_habit(&self, token: &str, id: i32) -> Result<HabitDto> {
        let response = self
            .client
            .get(self.url(&format!("/habits/{id}")))
            .bearer_auth(token)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn update_habit(&self, token: &str, id: i32, patch: &HabitPatch) -> Result<HabitDto> {
        let response = self
            .client
            .put(self.url(&format!("/habits/{id}")))
            .bearer_auth(token)
            .json(&UpdateHabitBody {
                name: patch.name.as_deref(),
                category: patch.category.as_deref(),
                target_per_day: patch.target_per_day,
            })
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn delete_habit(&self, token: &str, id: i32) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/habits/{id}")))
            .bearer_auth(token)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    pub async fn log_progress(
        &self,
        habit_id: i32,
        date_tracked: Option<NaiveDate>,
        amount_done: i32,
    ) -> Result<ProgressDto> {
        let response = self
            .client
            .post(self.url("/progress"))
            .json(&CreateProgressBody {
                habit_id,
                date_tracked,
                amount_done,
            })
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn list_all_progress(&self) -> Result<Vec<ProgressDto>> {
        let response = self.client.get(self.url("/progress")).send().await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn list_habit_progress(&self, habit_id: i32) -> Result<Vec<ProgressDto>> {
        let response = self
            .client
            .get(self.url(&format!("/habits/{habit_id}/progress")))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }
}

/// Turn a failing response into an error carrying the server's message.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        bail!("Not authorized. Log in again with 'habitrack login'");
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };

    bail!("API error ({status}): {message}")
}
