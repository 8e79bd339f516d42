//! Supplier account calls: login, registration, OTP, passwords, logout.

use async_trait::async_trait;
use serde_json::Value;
use session::{Credential, IdentitySource, UserIdentity};

use crate::endpoint::Endpoint;
use crate::error::{ApiError, reset_password_message};
use crate::http::{ApiClient, Payload};
use crate::types::{
    ApiAck, ChangePasswordRequest, DecodedToken, Envelope, ForgotPasswordRequest, LoginContent, LoginRequest,
    RegisterRequest, RequestOtpRequest, Supplier, decode, decode_ack,
};

/// Result of a login whose credential was accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Absent when the identity lookup failed; the session then holds the
    /// credential without a user until the next startup validation.
    pub user: Option<UserIdentity>,
}

/// What the server said about an OTP verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OtpVerification {
    pub verified: bool,
    /// Verified but the account still waits for admin approval.
    pub awaiting_approval: bool,
}

fn flag(content: Option<&Value>, key: &str) -> Option<i64> {
    match content?.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

impl ApiClient {
    /// Exchange username and password for a credential, then load the identity.
    ///
    /// # Errors
    ///
    /// Validation, transport and business errors from the login call, or
    /// [`ApiError::LoginRejected`] when no credential was issued. A failed
    /// identity lookup is not an error; see [`LoginOutcome::user`].
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let request = LoginRequest::new(username, password);
        request.validate()?;

        let endpoint = Endpoint::Login;
        let body = self.execute(&endpoint, Payload::json(&endpoint, &request)?).await?;
        let content: Envelope<LoginContent> = decode(endpoint.name(), body)?;
        let Some(token) = content.content.accepted_token() else {
            tracing::info!(username = %request.username, "login not accepted");
            return Err(ApiError::LoginRejected);
        };

        let generation = self.session().login(token);
        match self.current_identity().await {
            Ok(user) => {
                let applied = self.session().set_user_for(generation, user.clone());
                tracing::info!(user_id = %user.id, applied, "logged in");
                Ok(LoginOutcome { user: applied.then_some(user) })
            }
            Err(e) => {
                tracing::warn!(error = %e, "identity lookup after login failed");
                Ok(LoginOutcome { user: None })
            }
        }
    }

    /// End the session on the server and locally.
    ///
    /// Local state and cached responses are cleared whatever the server says.
    ///
    /// # Errors
    ///
    /// Transport and business errors from the logout call. An expired
    /// session is already logged out and is not an error.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = if self.session().token().is_some() {
            self.execute(&Endpoint::Logout, Payload::Empty).await.map(|_| ())
        } else {
            Ok(())
        };
        self.session().logout();
        self.cache().clear();
        match result {
            Err(e) if e.is_session_expired() => Ok(()),
            other => other,
        }
    }

    /// Submit a supplier registration. The server answers with the new
    /// account's id, used for OTP verification.
    ///
    /// # Errors
    ///
    /// Validation, transport and business errors.
    pub async fn register(&self, request: &RegisterRequest) -> Result<ApiAck, ApiError> {
        request.validate()?;
        let fields = vec![
            ("name", request.name.clone()),
            ("type", request.kind.clone()),
            ("cp", request.cp.clone()),
            ("npwp", request.npwp.clone()),
            ("address", request.address.clone()),
            ("shipping_province", request.shipping_province.clone()),
            ("shipping_city", request.shipping_city.clone()),
            ("shipping_district", request.shipping_district.clone()),
            ("zip", request.zip.clone()),
            ("phone1", request.phone1.clone()),
            ("phone2", request.phone2.clone()),
            ("email", request.email.clone()),
            ("password", request.password.clone()),
            ("acc_name", request.acc_name.clone()),
            ("acc_no", request.acc_no.clone()),
            ("acc_bank", request.acc_bank.clone()),
        ];
        let body = self.execute(&Endpoint::Register, Payload::Form(fields)).await?;
        decode_ack(Endpoint::Register.name(), body)
    }

    /// Ask the server to send an OTP to `username` (phone or email).
    ///
    /// # Errors
    ///
    /// Validation, transport and business errors. A 401 here does not end
    /// the session.
    pub async fn request_otp(&self, username: &str) -> Result<ApiAck, ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::Validation("username is required".to_owned()));
        }
        let endpoint = Endpoint::RequestOtp;
        let request = RequestOtpRequest { username: username.to_owned() };
        let body = self.execute(&endpoint, Payload::json(&endpoint, &request)?).await?;
        decode_ack(endpoint.name(), body)
    }

    /// # Errors
    ///
    /// Validation, transport and business errors. A wrong code comes back as
    /// a business error and leaves the session alone.
    pub async fn verify_otp(&self, user_id: &str, otp: &str) -> Result<OtpVerification, ApiError> {
        let (user_id, otp) = (user_id.trim(), otp.trim());
        if user_id.is_empty() || otp.is_empty() {
            return Err(ApiError::Validation("user id and OTP are required".to_owned()));
        }
        let endpoint = Endpoint::VerifyOtp { user_id: user_id.to_owned(), otp: otp.to_owned() };
        let ack = decode_ack(endpoint.name(), self.execute(&endpoint, Payload::Empty).await?)?;

        let status = flag(ack.content.as_ref(), "status").or(ack.status);
        let verified =
            ack.success == Some(true) || status == Some(1) || flag(ack.content.as_ref(), "verified") == Some(1);
        Ok(OtpVerification { verified, awaiting_approval: verified && status == Some(0) })
    }

    /// Reset a forgotten password with an OTP.
    ///
    /// # Errors
    ///
    /// Validation and transport errors, or a business error whose message
    /// has been reworded for the user.
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<ApiAck, ApiError> {
        request.validate()?;
        let endpoint = Endpoint::ForgotPassword;
        match self.execute(&endpoint, Payload::json(&endpoint, request)?).await {
            Ok(body) => decode_ack(endpoint.name(), body),
            Err(ApiError::Business { endpoint, status, message }) => {
                Err(ApiError::Business { endpoint, status, message: reset_password_message(&message) })
            }
            Err(e) => Err(e),
        }
    }

    /// # Errors
    ///
    /// Validation, transport and business errors.
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<ApiAck, ApiError> {
        request.validate()?;
        let body = self.execute(&Endpoint::ChangePassword, Payload::Form(request.form())).await?;
        decode_ack(Endpoint::ChangePassword.name(), body)
    }

    /// # Errors
    ///
    /// Transport, business and decode errors.
    pub async fn profile(&self) -> Result<Supplier, ApiError> {
        let body = self.execute(&Endpoint::Profile, Payload::Empty).await?;
        let envelope: Envelope<Supplier> = decode(Endpoint::Profile.name(), body)?;
        Ok(envelope.content)
    }

    /// Identity behind `token`, whether or not the session holds it.
    ///
    /// # Errors
    ///
    /// Transport, business and decode errors. A 401 forces a logout.
    pub async fn decode_token(&self, token: &Credential) -> Result<UserIdentity, ApiError> {
        let endpoint = Endpoint::DecodeToken;
        let body = self.execute_as(&endpoint, Payload::Empty, Some(token)).await?;
        let envelope: Envelope<DecodedToken> = decode(endpoint.name(), body)?;
        Ok(envelope.content.into())
    }

    async fn current_identity(&self) -> Result<UserIdentity, ApiError> {
        let body = self.execute(&Endpoint::DecodeToken, Payload::Empty).await?;
        let envelope: Envelope<DecodedToken> = decode(Endpoint::DecodeToken.name(), body)?;
        Ok(envelope.content.into())
    }
}

#[async_trait]
impl IdentitySource for ApiClient {
    type Error = ApiError;

    async fn decode_identity(&self, token: &Credential) -> Result<UserIdentity, ApiError> {
        self.decode_token(token).await
    }
}
