use inline_colorization::*;
use serde::Serialize;
use serde_json::{json, Value};

use super::CliError;
use crate::models::admin::{ActivityList, UserList};
use crate::models::Profile;
use crate::session::SessionManager;

/// Prints command results either as colored text or as JSON on stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    pub fn message(&self, text: &str) -> Result<(), CliError> {
        if self.json {
            return self.print_json(&json!({ "message": text }));
        }
        println!("{color_green}{text}{color_reset}");
        Ok(())
    }

    pub fn profile(&self, heading: &str, profile: &Profile) -> Result<(), CliError> {
        if self.json {
            return self.print_json(profile);
        }
        println!("{style_bold}{heading}{style_reset}");
        print!("{}", render_profile(profile));
        Ok(())
    }

    pub fn status(&self, session: &SessionManager) -> Result<(), CliError> {
        if self.json {
            return self.print_json(&status_json(session));
        }
        print!("{}", render_status(session));
        Ok(())
    }

    pub fn users(&self, list: &UserList) -> Result<(), CliError> {
        if self.json {
            return self.print_json(list);
        }
        print!("{}", render_users(list));
        Ok(())
    }

    pub fn activities(&self, list: &ActivityList) -> Result<(), CliError> {
        if self.json {
            return self.print_json(list);
        }
        print!("{}", render_activities(list));
        Ok(())
    }

    /// Free-form backend payloads. Plain strings are printed as-is in text mode.
    pub fn value(&self, value: &Value) -> Result<(), CliError> {
        match value {
            Value::String(s) if !self.json => {
                println!("{s}");
                Ok(())
            }
            other => self.print_json(other),
        }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), CliError> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub(crate) fn render_profile(profile: &Profile) -> String {
    let mut out = format!(
        "  name:       {}\n  email:      {}\n  id:         {}\n",
        profile.name, profile.email, profile.id
    );
    if let Some(active) = profile.is_active() {
        out.push_str(&format!("  active:     {}\n", yes_no(active)));
    }
    if let Some(created) = profile.created_at() {
        out.push_str(&format!("  created:    {}\n", created));
    }
    out.push_str(&format!(
        "  last login: {}\n",
        profile.last_login().unwrap_or("never")
    ));
    out
}

pub(crate) fn status_json(session: &SessionManager) -> Value {
    json!({
        "role": session.state().label(),
        "authenticated": session.is_authenticated(),
        "admin": session.is_admin(),
        "profile": session.state().profile(),
    })
}

pub(crate) fn render_status(session: &SessionManager) -> String {
    let state = session.state();
    let mut out = match state.profile() {
        Some(profile) => format!(
            "Signed in as {style_bold}{}{style_reset} ({})\n{}",
            state.label(),
            profile.email,
            render_profile(profile)
        ),
        None => format!("{color_yellow}Not signed in{color_reset}\n"),
    };
    out.push_str(&format!(
        "  authenticated: {}\n  admin:         {}\n",
        yes_no(session.is_authenticated()),
        yes_no(session.is_admin())
    ));
    out
}

pub(crate) fn render_users(list: &UserList) -> String {
    let mut out = format!("{style_bold}Users ({} total){style_reset}\n", list.total);
    for user in &list.users {
        let marker = match user.is_active() {
            Some(false) => format!("{color_red}inactive{color_reset}"),
            _ => format!("{color_green}active{color_reset}"),
        };
        out.push_str(&format!(
            "  {:<8} {:<24} {:<32} {}\n",
            user.id, user.name, user.email, marker
        ));
    }
    out
}

pub(crate) fn render_activities(list: &ActivityList) -> String {
    let mut out = format!("{style_bold}Activity log ({} total){style_reset}\n", list.total);
    for activity in &list.activities {
        let who = activity
            .user_name
            .as_deref()
            .or(activity.user_id.as_deref())
            .unwrap_or("-");
        out.push_str(&format!(
            "  {color_cyan}{}{color_reset} [{}] {}: {}\n",
            activity.timestamp, activity.kind, who, activity.description
        ));
    }
    out
}
