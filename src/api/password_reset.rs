// Forgot-password wizard
// Three steps against the backend: fetch the account's security
// questions, verify the answers for a one-shot reset token, then set the
// new password. The wizard type enforces the step order.

use serde_json::json;

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::models::{
    MessageResponse, SecurityAnswer, SecurityQuestion, SecurityQuestionList, VerifyAnswersResponse,
};
use crate::validate;

pub struct PasswordReset<'a> {
    client: &'a ApiClient,
    email: String,
    questions: Vec<SecurityQuestion>,
    reset_token: Option<String>,
}

impl<'a> PasswordReset<'a> {
    /// Step 1: look up the account and fetch its security questions.
    pub async fn start(client: &'a ApiClient, email: &str) -> Result<PasswordReset<'a>> {
        validate::email(email)?;

        let data: SecurityQuestionList = client
            .post_json("/forget-password/start/", &json!({ "email": email }))
            .await?;

        Ok(Self {
            client,
            email: email.to_string(),
            questions: data.questions,
            reset_token: None,
        })
    }

    /// The questions to answer, in the order the answers must be given.
    pub fn questions(&self) -> &[SecurityQuestion] {
        &self.questions
    }

    /// Step 2: verify one answer per question. The backend compares
    /// case-insensitively; answers are trimmed here. On success the
    /// wizard holds the reset token for step 3 and the server's
    /// acknowledgement message is returned.
    pub async fn verify(&mut self, answers: &[String]) -> Result<String> {
        if answers.len() != self.questions.len() {
            return Err(ApiError::Validation(format!(
                "Expected {} answers, got {}.",
                self.questions.len(),
                answers.len()
            )));
        }

        let answers: Vec<SecurityAnswer> = self
            .questions
            .iter()
            .zip(answers)
            .map(|(question, answer)| SecurityAnswer {
                question_id: question.id,
                answer: answer.trim().to_string(),
            })
            .collect();

        let data: VerifyAnswersResponse = self
            .client
            .post_json(
                "/forget-password/verify/",
                &json!({ "email": self.email, "answers": answers }),
            )
            .await?;

        self.reset_token = Some(data.reset_token);
        Ok(data.message)
    }

    /// Step 3: set the new password. The backend's own checks run
    /// locally first; nothing is sent unless they pass.
    pub async fn reset(&self, new_password: &str, confirm_password: &str) -> Result<MessageResponse> {
        let token = self.reset_token.as_deref().ok_or_else(|| {
            ApiError::Validation("Security answers have not been verified.".to_string())
        })?;

        if new_password.is_empty() || confirm_password.is_empty() {
            return Err(ApiError::Validation("All fields are required.".to_string()));
        }
        validate::confirmation(new_password, confirm_password)?;
        if new_password.len() < 8 {
            return Err(ApiError::Validation(
                "Password must be at least 8 characters long.".to_string(),
            ));
        }

        self.client
            .post_json(
                "/forget-password/reset/",
                &json!({
                    "reset_token": token,
                    "new_password": new_password,
                    "confirm_password": confirm_password,
                }),
            )
            .await
    }
}
