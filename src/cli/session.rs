//! The interactive login loop.

use incident::{
    Config, Role, School, SecurityManager, User,
    storage::{AuthError, seed},
};
use tracing::instrument;

use crate::cli::{admin, prompt, student, teacher, terminal::Colorize};

/// Run the role menus against the demo school until the operator exits.
#[instrument(skip_all)]
pub fn run(config: Config) -> anyhow::Result<()> {
    let mut school = seed::demo_school(config);
    let security = SecurityManager::new();

    let profile = school.profile();
    println!(
        "{}",
        format!("Bullying incident reporting for {} ({})", profile.name, profile.id).info()
    );

    while let Some(role) = choose_role()? {
        let Some(user) = login(&school, role)? else {
            continue;
        };

        println!("{}", format!("Welcome, {}!", user.name()).success());
        match role {
            Role::Student => student::menu(&mut school, &user)?,
            Role::Teacher => teacher::menu(&mut school, &user, &security)?,
            Role::Administrator => admin::menu(&mut school, &user)?,
        }
        println!("{}", format!("{} logged out.", user.name()).dim());
    }

    println!("Goodbye.");
    Ok(())
}

/// `None` means the operator chose to exit.
fn choose_role() -> anyhow::Result<Option<Role>> {
    let mut options: Vec<String> = Role::ALL
        .iter()
        .map(|role| format!("Log in as {role}"))
        .collect();
    options.push("Exit".to_string());

    let choice = prompt::select("Main menu", &options)?;
    Ok(Role::ALL.get(choice).copied())
}

/// The user is cloned out of the directory so the menus can mutate the
/// school while acting as them.
fn login(school: &School, role: Role) -> anyhow::Result<Option<User>> {
    let email = prompt::text("Email")?;
    let password = prompt::password("Password")?;

    match authenticate(school, &email, &password, role) {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            eprintln!("{}", e.to_string().error());
            Ok(None)
        }
    }
}

/// Surrounding whitespace is ignored in both the email and the password.
fn authenticate(
    school: &School,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User, AuthError> {
    school
        .login(email.trim(), password.trim(), role)
        .map(User::clone)
}
