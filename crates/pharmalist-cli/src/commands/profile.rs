//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the profile command.
pub async fn execute_profile(
    args: ProfileArgs,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, name, formatter),
        ProfileAction::Set {
            name,
            url,
            user,
            domain,
            token,
        } => {
            let profile = Profile {
                server_url: url,
                user,
                domain,
                token,
            };
            set_profile(config, name, profile, formatter)
        }
        ProfileAction::Delete { name } => delete_profile(config, name, formatter),
    }
}

fn print_profile(profile: &Profile, indent: &str) {
    println!("{}URL: {}", indent, profile.server_url);
    if let Some(user) = &profile.user {
        println!("{}User: {}", indent, user);
    }
    if let Some(domain) = profile.domain {
        println!("{}Domain: {}", indent, domain);
    }
    if profile.token.is_some() {
        println!("{}Token: ********", indent);
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    let mut names: Vec<_> = config.profiles.keys().collect();
    names.sort();

    println!("Available profiles:");
    for name in names {
        let active = name == &config.active_profile;
        println!(
            "{}{}",
            if active { "* " } else { "  " },
            if active { formatter.success(name) } else { name.clone() }
        );
        print_profile(&config.profiles[name], "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile(profile, "  ");
    Ok(())
}

/// Switch to a different profile.
fn switch_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    config.save()?;
    println!(
        "{}",
        formatter.success(&format!("Switched to profile '{}'", name))
    );
    Ok(())
}

/// Create or update a profile.
fn set_profile(config: &mut Config, name: String, profile: Profile, formatter: &Formatter) -> Result<()> {
    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    config.set_profile(name.clone(), profile);
    config.save()?;

    println!(
        "{}",
        formatter.success(&format!("{} profile '{}'", action, name))
    );
    Ok(())
}

/// Delete a profile.
fn delete_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    if name == config.active_profile {
        return Err(CliError::NotPermitted(
            "Cannot delete the active profile".to_string(),
        ));
    }

    if config.profiles.remove(&name).is_some() {
        config.save()?;
        println!(
            "{}",
            formatter.success(&format!("Deleted profile '{}'", name))
        );
    } else {
        println!(
            "{}",
            formatter.warning(&format!("Profile '{}' does not exist", name))
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use pharmalist_domain::DomainKey;
    use tempfile::TempDir;

    fn scratch_config(dir: &TempDir) -> Config {
        Config::load_from(&dir.path().join("config.toml")).unwrap()
    }

    #[tokio::test]
    async fn test_set_and_switch_profile() {
        let dir = TempDir::new().unwrap();
        let mut config = scratch_config(&dir);
        let formatter = Formatter::new(OutputFormat::Table, false);

        let args = ProfileArgs {
            action: ProfileAction::Set {
                name: "field".to_string(),
                url: "http://lists.internal:8000".to_string(),
                user: Some("Anita".to_string()),
                domain: Some(DomainKey::Customer),
                token: None,
            },
        };
        execute_profile(args, &mut config, &formatter).await.unwrap();
        assert!(config.profiles.contains_key("field"));

        switch_profile(&mut config, "field".to_string(), &formatter).unwrap();
        assert_eq!(config.active_profile, "field");

        let reloaded = scratch_config(&dir);
        assert_eq!(reloaded.active_profile, "field");
        assert_eq!(
            reloaded.get_active_profile().unwrap().domain,
            Some(DomainKey::Customer)
        );
    }

    #[test]
    fn test_switch_to_missing_profile() {
        let dir = TempDir::new().unwrap();
        let mut config = scratch_config(&dir);
        let formatter = Formatter::new(OutputFormat::Table, false);

        assert!(switch_profile(&mut config, "nope".to_string(), &formatter).is_err());
        assert_eq!(config.active_profile, "default");
    }

    #[test]
    fn test_delete_active_profile() {
        let mut config = Config::default();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = delete_profile(&mut config, "default".to_string(), &formatter);
        assert!(matches!(result, Err(CliError::NotPermitted(_))));
    }
}
