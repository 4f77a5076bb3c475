//! Sign-in and profile commands.

use anyhow::{Context, Result};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

use taskboard::ui::{icons, with_spinner};
use taskboard_common::validation::{LoginForm, PasswordChangeForm, RegistrationForm};
use taskboard_common::{ChangePasswordRequest, EditProfileRequest, LoginRequest, RegisterRequest};

use super::{Ctx, report_invalid};

fn prompt_text(prompt: &str) -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))
}

fn prompt_secret(prompt: &str) -> Result<String> {
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))
}

pub async fn cmd_login(ctx: &Ctx, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt_text("Email")?,
    };
    let password = match password {
        Some(password) => password,
        None => prompt_secret("Password")?,
    };
    let form = LoginForm { email, password };
    form.validate().map_err(|e| report_invalid(&e))?;

    let request = LoginRequest {
        email: form.email.trim().to_string(),
        password: form.password,
    };
    let session = with_spinner("Signing in...", ctx.gateway.login(&request))
        .await
        .map_err(|e| match e {
            taskboard::errors::GatewayError::Unauthorized => {
                anyhow::anyhow!("Incorrect email or password")
            }
            other => ctx.backend_error(other),
        })?;
    ctx.sessions.save(&session)?;

    println!(
        "{}Signed in as {}",
        icons::CHECK,
        style(session.detail.display_name()).bold()
    );
    Ok(())
}

pub fn cmd_logout(ctx: &Ctx) -> Result<()> {
    let had_session = ctx.sessions.load().ok().flatten().is_some();
    ctx.sessions.clear()?;
    if had_session {
        println!("{}Signed out", icons::CHECK);
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub struct RegisterArgs {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub surname: String,
    pub password: Option<String>,
}

pub async fn cmd_register(ctx: &Ctx, args: RegisterArgs) -> Result<()> {
    let (password, confirm_password) = match args.password {
        Some(password) => (password.clone(), password),
        None => (prompt_secret("Password")?, prompt_secret("Confirm password")?),
    };
    let form = RegistrationForm {
        email: args.email,
        username: args.username,
        first_name: args.first_name,
        surname: args.surname,
        password,
        confirm_password,
    };
    form.validate().map_err(|e| report_invalid(&e))?;

    let request = RegisterRequest {
        email: form.email.trim().to_string(),
        username: form.username.trim().to_string(),
        first_name: form.first_name.trim().to_string(),
        surname: form.surname.trim().to_string(),
        password: form.password,
    };
    with_spinner("Creating account...", ctx.gateway.register(&request))
        .await
        .map_err(|e| ctx.backend_error(e))?;

    println!(
        "{}Account created. Run `taskboard login` to sign in.",
        icons::CHECK
    );
    Ok(())
}

pub async fn cmd_passwd(ctx: &Ctx) -> Result<()> {
    let session = ctx.session()?;
    let form = PasswordChangeForm {
        current_password: prompt_secret("Current password")?,
        new_password: prompt_secret("New password")?,
        confirm_password: prompt_secret("Confirm new password")?,
    };
    form.validate().map_err(|e| report_invalid(&e))?;

    let request = ChangePasswordRequest {
        member_id: session.member_id.clone(),
        current_password: form.current_password,
        new_password: form.new_password,
    };
    ctx.gateway
        .change_password(&session, &request)
        .await
        .map_err(|e| ctx.backend_error(e))?;
    println!("{}Password changed", icons::CHECK);
    Ok(())
}

pub async fn cmd_whoami(ctx: &Ctx, refresh: bool) -> Result<()> {
    let mut session = ctx.session()?;
    if refresh {
        let member = ctx
            .gateway
            .member(&session, &session.member_id)
            .await
            .map_err(|e| ctx.backend_error(e))?;
        session = session.with_detail(member.detail);
        ctx.sessions.save(&session)?;
    }

    let detail = &session.detail;
    println!("{}{}", icons::PERSON, style(detail.display_name()).bold());
    println!("  email     {}", detail.member_email);
    println!("  username  {}", detail.username);
    println!("  member id {}", session.member_id);
    if let Some(img) = detail.img.as_deref() {
        println!("  avatar    {}", img);
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct ProfileArgs {
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub username: Option<String>,
    pub img: Option<String>,
}

impl ProfileArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.lastname.is_none() && self.username.is_none() && self.img.is_none()
    }
}

pub async fn cmd_profile(ctx: &Ctx, args: ProfileArgs) -> Result<()> {
    let session = ctx.session()?;
    if args.is_empty() {
        return cmd_whoami(ctx, false).await;
    }

    let mut detail = session.detail.clone();
    if let Some(name) = args.name {
        detail.member_name = name;
    }
    if let Some(lastname) = args.lastname {
        detail.member_lastname = Some(lastname);
    }
    if let Some(username) = args.username {
        detail.username = username;
    }
    if let Some(img) = args.img {
        detail.img = Some(img);
    }

    let request = EditProfileRequest {
        member_id: session.member_id.clone(),
        detail,
    };
    let updated = with_spinner("Saving profile...", ctx.gateway.edit_profile(&session, &request))
        .await
        .map_err(|e| ctx.backend_error(e))?;
    ctx.sessions.save(&session.with_detail(updated.detail))?;

    println!("{}Profile updated", icons::CHECK);
    Ok(())
}
