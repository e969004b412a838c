//! Account API handlers: signup, login, verification, and user listing.
//!
//! ```text
//! POST  /signup       {"firstName":"Asha","lastName":"Roy",...}
//! POST  /login        {"identifier":"asha@example.org","password":"..."}
//! POST  /admin-login  {"username":"admin","password":"..."}
//! GET   /users-pending
//! PATCH /approve      {"_id":"<uuid>"}
//! ```

use actix_web::{get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{LoginAttempt, SignupDetails};
use crate::domain::user::{ContactNumber, Email, Gender, LoginHandle, UserId, UserProfile};
use crate::domain::Error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request body for `POST /signup`. Every field optional so validation
/// can report all failures in one pass.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Required first name.
    pub first_name: Option<String>,
    /// Optional middle name.
    pub middle_name: Option<String>,
    /// Required last name.
    pub last_name: Option<String>,
    /// Unique login handle.
    pub login_handle: Option<String>,
    /// Unique email address.
    pub email: Option<String>,
    /// Unique ten-digit contact number.
    pub contact_number: Option<String>,
    /// Age in years.
    pub age: Option<i32>,
    /// Gender.
    pub gender: Option<String>,
    /// Chosen password.
    pub password: Option<String>,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Email address or contact number.
    pub identifier: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Request body for `POST /admin-login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AdminLoginRequest {
    /// Administrator login name.
    pub username: Option<String>,
    /// Administrator password.
    pub password: Option<String>,
}

/// Request body for `PATCH /approve`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ApproveRequest {
    /// Identifier of the user to verify.
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

/// Bare message envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

/// Success envelope for `POST /login`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Always `success` on the 200 path.
    pub status: String,
    /// Human-readable outcome.
    pub message: String,
    /// Signed bearer token.
    pub token: String,
    /// The authenticated user, password stripped.
    pub user: UserProfile,
}

/// Success envelope for `POST /admin-login`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Signed bearer token with the admin role.
    pub token: String,
}

/// Success envelope for `GET /users-pending`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    /// Every user, password stripped, oldest first.
    pub users: Vec<UserProfile>,
}

/// Success envelope for `PATCH /approve`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApproveResponse {
    /// Human-readable outcome.
    pub message: String,
    /// The verified user, password stripped.
    pub user: UserProfile,
}

impl SignupRequest {
    /// Validate the request, collecting every failure message.
    fn into_domain(self) -> Result<SignupDetails, Error> {
        let mut errors = Vec::new();

        let first_name = self.first_name.unwrap_or_default().trim().to_owned();
        if first_name.is_empty() {
            errors.push("First name is required".to_owned());
        }
        let last_name = self.last_name.unwrap_or_default().trim().to_owned();
        if last_name.is_empty() {
            errors.push("Last name is required".to_owned());
        }

        let contact_number = match self.contact_number.as_deref() {
            None | Some("") => {
                errors.push("Contact number is required".to_owned());
                None
            }
            Some(raw) => match ContactNumber::new(raw) {
                Ok(number) => Some(number),
                Err(error) => {
                    errors.push(error.to_string());
                    None
                }
            },
        };

        let email = match self.email.as_deref() {
            None | Some("") => {
                errors.push("Email is required".to_owned());
                None
            }
            Some(raw) => match Email::new(raw) {
                Ok(email) => Some(email),
                Err(error) => {
                    errors.push(error.to_string());
                    None
                }
            },
        };

        let login_handle = match self.login_handle.as_deref() {
            None | Some("") => {
                errors.push("Login handle is required".to_owned());
                None
            }
            Some(raw) => match LoginHandle::new(raw) {
                Ok(handle) => Some(handle),
                Err(error) => {
                    errors.push(error.to_string());
                    None
                }
            },
        };

        let password = self.password.unwrap_or_default();
        if password.trim().is_empty() {
            errors.push("Password is required".to_owned());
        }

        let gender = match self.gender.as_deref() {
            None | Some("") => {
                errors.push("Gender is required".to_owned());
                None
            }
            Some(raw) => match Gender::parse(raw) {
                Ok(gender) => Some(gender),
                Err(error) => {
                    errors.push(error.to_string());
                    None
                }
            },
        };

        let age = self.age.filter(|age| *age > 0);
        if age.is_none() {
            errors.push("Age is required".to_owned());
        }

        if !errors.is_empty() {
            return Err(Error::invalid_request("Validation failed")
                .with_details(json!({ "errors": errors })));
        }

        // All the Nones pushed an error above, so these unwraps are the
        // happy path by construction; still avoid panicking.
        match (contact_number, email, login_handle, gender, age) {
            (Some(contact_number), Some(email), Some(login_handle), Some(gender), Some(age)) => {
                Ok(SignupDetails {
                    first_name,
                    middle_name: self
                        .middle_name
                        .map(|raw| raw.trim().to_owned())
                        .filter(|raw| !raw.is_empty()),
                    last_name,
                    login_handle,
                    email,
                    contact_number,
                    age,
                    gender,
                    password,
                })
            }
            _ => Err(Error::internal("signup validation reached an impossible state")),
        }
    }
}

/// Register a new citizen account.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 409, description = "Duplicate unique field", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "signUp"
)]
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let details = payload.into_inner().into_domain()?;
    state.accounts.sign_up(details).await?;
    Ok(HttpResponse::Created().json(MessageResponse {
        message: "User created successfully".to_owned(),
    }))
}

/// Authenticate a citizen and issue a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Missing fields", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account not verified", body = Error),
        (status = 404, description = "No matching user", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest {
        identifier,
        password,
    } = payload.into_inner();
    let (Some(identifier), Some(password)) = (
        identifier.filter(|raw| !raw.trim().is_empty()),
        password.filter(|raw| !raw.is_empty()),
    ) else {
        return Err(Error::invalid_request(
            "Email/Contact Number and password are required.",
        )
        .into());
    };

    let session = state
        .login
        .login(LoginAttempt {
            identifier,
            password,
        })
        .await?;

    Ok(web::Json(LoginResponse {
        status: "success".to_owned(),
        message: "Login successful".to_owned(),
        token: session.token.token,
        user: session.user,
    }))
}

/// Authenticate the administrator.
#[utoipa::path(
    post,
    path = "/admin-login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login success", body = AdminLoginResponse),
        (status = 400, description = "Missing fields", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Configuration failure", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "adminLogin"
)]
#[post("/admin-login")]
pub async fn admin_login(
    state: web::Data<HttpState>,
    payload: web::Json<AdminLoginRequest>,
) -> ApiResult<web::Json<AdminLoginResponse>> {
    let AdminLoginRequest { username, password } = payload.into_inner();
    let (Some(username), Some(password)) = (
        username.filter(|raw| !raw.trim().is_empty()),
        password.filter(|raw| !raw.is_empty()),
    ) else {
        return Err(Error::invalid_request("Username and password are required").into());
    };

    let token = state.login.admin_login(&username, &password).await?;
    Ok(web::Json(AdminLoginResponse {
        message: "Login successful".to_owned(),
        token: token.token,
    }))
}

/// List every user for the admin review screen.
#[utoipa::path(
    get,
    path = "/users-pending",
    responses(
        (status = 200, description = "Users, oldest first", body = UserListResponse),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "listUsers"
)]
#[get("/users-pending")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<UserListResponse>> {
    let users = state.accounts_query.list_users().await?;
    Ok(web::Json(UserListResponse { users }))
}

/// Verify a user account.
#[utoipa::path(
    patch,
    path = "/approve",
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "User verified", body = ApproveResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Storage failure", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "approveUser"
)]
#[patch("/approve")]
pub async fn approve_user(
    state: web::Data<HttpState>,
    payload: web::Json<ApproveRequest>,
) -> ApiResult<web::Json<ApproveResponse>> {
    let id = payload
        .into_inner()
        .id
        .as_deref()
        .map(UserId::new)
        .transpose()
        .map_err(|_| Error::invalid_request("Invalid user ID"))?
        .ok_or_else(|| Error::invalid_request("Invalid user ID"))?;

    let user = state.accounts.verify(id).await?;
    Ok(web::Json(ApproveResponse {
        message: "User approved successfully".to_owned(),
        user,
    }))
}
