use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, info, warn};

use campus_core::api::{ApiClient, Resource, ResourceGateway};
use campus_core::auth::{CredentialStore, Credentials};
use campus_core::{Decision, Portal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Students,
    Teachers,
    Courses,
    Enrollments,
    Grades,
}

impl ResourceKind {
    /// Route whose requirement governs this collection.
    pub fn route(&self) -> &'static str {
        match self {
            ResourceKind::Students => "/students",
            ResourceKind::Teachers => "/teachers",
            ResourceKind::Courses => "/courses",
            ResourceKind::Enrollments => "/enrollments",
            ResourceKind::Grades => "/grades",
        }
    }
}

pub enum Action {
    List,
    Show(i64),
    Create(String),
    Update(i64, String),
    Delete(i64),
}

/// Admit `path` or explain where the guard sent us.
fn admitted<'a>(portal: &'a Portal, path: &str) -> Result<&'a ApiClient> {
    portal.open(path).or_else(|decision| {
        let target = decision.redirect_target().unwrap_or_default();
        if target == portal.guard().login_route() {
            bail!("{} requires login. Run `campus login` first.", path)
        }
        bail!("Access to {} denied for this account (redirected to {})", path, target)
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn login(portal: &mut Portal, email: Option<String>, remember: bool) -> Result<()> {
    if let Decision::Redirect(_) = portal.navigate(portal.guard().login_route()) {
        let name = portal
            .session()
            .identity()
            .map(|i| i.email.clone())
            .unwrap_or_default();
        println!("Already logged in as {}. Run `campus logout` first.", name);
        return Ok(());
    }

    let email = match email
        .or_else(|| std::env::var("CAMPUS_EMAIL").ok())
        .or_else(|| portal.config().last_email.clone())
    {
        Some(e) if !e.trim().is_empty() => e,
        _ => prompt_email()?,
    };

    let credentials = CredentialStore::new();
    let password = match std::env::var("CAMPUS_PASSWORD") {
        Ok(p) if !p.is_empty() => p,
        _ => match credentials.password(&email) {
            Some(stored) if confirm("Use stored password? [Y/n]: ")? => stored,
            _ => rpassword::prompt_password("Password: ")?,
        },
    };

    println!("Authenticating...");
    match portal.login(Credentials::new(email.clone(), password.clone())).await {
        Ok(identity) => {
            if remember {
                if let Err(e) = credentials.remember(&email, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }
            }
            if let Err(e) = portal.save_config() {
                warn!(error = %e, "Failed to save config");
            }
            info!("Login successful");
            println!("Logged in as {} ({})", identity.full_name(), role_list(portal));
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Login failed");
            bail!("{}", e)
        }
    }
}

pub fn logout(portal: &mut Portal, forget: bool) {
    let was_authenticated = portal.session().is_authenticated();
    let email = portal
        .session()
        .identity()
        .map(|i| i.email.clone())
        .or_else(|| portal.config().last_email.clone());
    portal.logout();
    if forget {
        match email {
            Some(email) => match CredentialStore::new().forget(&email) {
                Ok(()) => println!("Forgot stored password for {}.", email),
                Err(e) => warn!(error = %e, "Failed to remove stored password"),
            },
            None => println!("No account to forget."),
        }
    }
    if was_authenticated {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
}

pub fn whoami(portal: &Portal) {
    match portal.session().identity() {
        Some(identity) => {
            println!("{} <{}>", identity.full_name(), identity.email);
            println!("Roles: {}", role_list(portal));
        }
        None => println!("Not logged in."),
    }
}

pub fn open(portal: &Portal, path: &str) {
    match portal.navigate(path) {
        Decision::Allow => println!("allow {}", path),
        Decision::Redirect(target) => println!("redirect {} -> {}", path, target),
    }
}

pub async fn resource(portal: &Portal, kind: ResourceKind, action: Action) -> Result<()> {
    let api = admitted(portal, kind.route())?;
    match kind {
        ResourceKind::Students => run(api.students(), action).await,
        ResourceKind::Teachers => run(api.teachers(), action).await,
        ResourceKind::Courses => run(api.courses(), action).await,
        ResourceKind::Enrollments => run(api.enrollments(), action).await,
        ResourceKind::Grades => run(api.grades(), action).await,
    }
}

async fn run<R>(gateway: ResourceGateway<'_, R>, action: Action) -> Result<()>
where
    R: Resource<Id = i64> + Serialize,
    R::Patch: DeserializeOwned,
{
    let collection = gateway.collection();
    match action {
        Action::List => print_json(&gateway.get_all().await?),
        Action::Show(id) => print_json(&gateway.get_by_id(id).await?),
        Action::Create(data) => {
            let patch = parse_patch::<R>(&data)?;
            print_json(&gateway.create(&patch).await?)
        }
        Action::Update(id, data) => {
            let patch = parse_patch::<R>(&data)?;
            print_json(&gateway.update(id, &patch).await?)
        }
        Action::Delete(id) => {
            gateway.delete(id).await?;
            println!("Deleted {} {}", collection, id);
            Ok(())
        }
    }
}

fn parse_patch<R: Resource>(data: &str) -> Result<R::Patch>
where
    R::Patch: DeserializeOwned,
{
    serde_json::from_str(data)
        .with_context(|| format!("Invalid JSON for {}", R::COLLECTION))
}

pub async fn stats(portal: &Portal) -> Result<()> {
    let api = admitted(portal, portal.guard().landing_route())?;
    let (students, teachers) =
        futures::future::try_join(api.student_count(), api.teacher_count()).await?;
    println!("Students: {}", students);
    println!("Teachers: {}", teachers);
    Ok(())
}

fn role_list(portal: &Portal) -> String {
    let roles: Vec<&str> = portal
        .session()
        .identity()
        .map(|i| i.roles.sorted().iter().map(|r| r.display_name()).collect())
        .unwrap_or_default();
    if roles.is_empty() {
        "no roles".to_string()
    } else {
        roles.join(", ")
    }
}

fn prompt_email() -> Result<String> {
    print!("Email: ");
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase() != "n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::auth::MemoryStorage;
    use campus_core::models::{Student, StudentPatch};
    use campus_core::{Config, RouteTable};

    #[test]
    fn test_every_resource_route_is_declared() {
        let routes = RouteTable::standard();
        for kind in ResourceKind::value_variants() {
            assert!(routes.get(kind.route()).is_some(), "{:?}", kind);
        }
    }

    #[test]
    fn test_resources_need_login() {
        let portal = Portal::with_storage(Config::default(), Box::new(MemoryStorage::new())).unwrap();
        let err = admitted(&portal, ResourceKind::Grades.route()).err().expect("expected login redirect error");
        assert!(err.to_string().contains("requires login"));
    }

    #[test]
    fn test_parse_patch() {
        let patch = parse_patch::<Student>(r#"{"firstName":"Ada"}"#).unwrap();
        assert_eq!(
            patch,
            StudentPatch {
                first_name: Some("Ada".to_string()),
                ..Default::default()
            }
        );
        assert!(parse_patch::<Student>("not json").is_err());
    }
}
