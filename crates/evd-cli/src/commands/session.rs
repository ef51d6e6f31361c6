//! Login, logout and whoami.

use std::io::Write;

use anyhow::{Context, Result};
use evd_core::Role;
use evd_core::forms::LoginForm;
use evd_db::{Backend, SessionStore};

use super::util::current_session;

pub fn login<W: Write>(writer: &mut W, backend: &mut Backend, form: &LoginForm) -> Result<Role> {
    let role = form.validate()?;
    SessionStore::new(backend)
        .login(role)
        .context("failed to store session role")?;
    writeln!(writer, "Logged in as {}", role.label())?;
    Ok(role)
}

pub fn logout<W: Write>(writer: &mut W, backend: &mut Backend) -> Result<()> {
    SessionStore::new(backend)
        .logout()
        .context("failed to clear session role")?;
    writeln!(writer, "Logged out")?;
    Ok(())
}

pub fn whoami<W: Write>(writer: &mut W, backend: &mut Backend) -> Result<()> {
    match current_session(backend).role() {
        Some(role) => writeln!(writer, "{}", role.label())?,
        None => writeln!(writer, "Not logged in")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use evd_db::MemoryStore;

    fn form(password: &str) -> LoginForm {
        LoginForm {
            email: "alice@example.com".to_string(),
            password: password.to_string(),
            role: Role::Organiser,
        }
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn login_then_whoami_then_logout() {
        let mut backend = Backend::Memory(MemoryStore::new());
        let mut out = Vec::new();

        login(&mut out, &mut backend, &form("secret1")).unwrap();
        whoami(&mut out, &mut backend).unwrap();
        logout(&mut out, &mut backend).unwrap();
        whoami(&mut out, &mut backend).unwrap();

        assert_eq!(
            output(out),
            "Logged in as Organiser\nOrganiser\nLogged out\nNot logged in\n"
        );
    }

    #[test]
    fn invalid_login_leaves_session_alone() {
        let mut backend = Backend::Memory(MemoryStore::new());
        let mut out = Vec::new();

        let err = login(&mut out, &mut backend, &form("123")).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 chars");
        assert_eq!(current_session(&mut backend).role(), None);
    }
}
