use crate::{Command, Field};
use anyhow::Result;
use housing_guard::actions::{row_actions, ActionDispatcher, ActionOutcome};
use housing_guard::config::Config;
use housing_guard::console::ConsolePort;
use housing_guard::format::{format_currency_with, format_date, Locale};
use housing_guard::notify::{show_safe_alert, AlertKind};
use housing_guard::permissions::{CapabilityResolver, RoleDescriptor};
use housing_guard::render::apply_capabilities;
use housing_guard::sanitize::{escape_html, sanitize_url, strip_tags};
use housing_guard::store::{load_role, JsonFileRoleStore};
use housing_guard::validate::Validators;
use std::process::ExitCode;
use std::sync::Arc;

pub struct Context {
    pub config: Config,
    pub validators: Validators,
    pub store: JsonFileRoleStore,
    pub port: Arc<ConsolePort>,
}

impl Context {
    pub fn new(config: Config, auto_yes: bool) -> Result<Self> {
        let validators = Validators::compile(&config.patterns.table())?;
        let store = JsonFileRoleStore::new(&config.permissions.store_path());
        Ok(Self {
            config,
            validators,
            store,
            port: Arc::new(ConsolePort::new(auto_yes)),
        })
    }

    /// Fetched fresh on every command
    fn current_role(&self) -> Result<Option<RoleDescriptor>> {
        load_role(&self.store, self.config.permissions.missing_role())
    }
}

fn verdict(valid: bool) -> ExitCode {
    println!("{}", if valid { "valid" } else { "invalid" });
    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn outcome_code(outcome: ActionOutcome) -> ExitCode {
    match outcome {
        ActionOutcome::Performed(_) => ExitCode::SUCCESS,
        ActionOutcome::Cancelled => {
            println!("Cancelled");
            ExitCode::SUCCESS
        }
        ActionOutcome::Unrouted => {
            println!("Unknown item type, nothing to do");
            ExitCode::SUCCESS
        }
        ActionOutcome::Denied => ExitCode::FAILURE,
    }
}

pub fn run(ctx: &Context, command: &Command) -> Result<ExitCode> {
    match command {
        Command::Check { field, value } => {
            let valid = match field {
                Field::Phone => ctx.validators.phone(value),
                Field::Email => ctx.validators.email(value),
                Field::NationalId => ctx.validators.national_id(value),
                Field::Plate => ctx.validators.license_plate(value),
                Field::Url => !sanitize_url(value).is_empty(),
            };
            Ok(verdict(valid))
        }
        Command::Escape { text } => {
            println!("{}", escape_html(Some(text)));
            Ok(ExitCode::SUCCESS)
        }
        Command::Strip { text } => {
            println!("{}", strip_tags(text));
            Ok(ExitCode::SUCCESS)
        }
        Command::Url { url } => {
            println!("{}", sanitize_url(url));
            Ok(ExitCode::SUCCESS)
        }
        Command::Date { value, locale } => {
            let locale = locale
                .as_deref()
                .map(Locale::from_tag)
                .unwrap_or_else(|| ctx.config.display.locale());
            let formatted = format_date(value.as_str(), locale);
            if formatted.is_empty() {
                eprintln!("Unrecognized date: {}", value);
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", formatted);
            Ok(ExitCode::SUCCESS)
        }
        Command::Currency { amount } => {
            let amount = amount.as_deref().and_then(|a| a.trim().parse::<f64>().ok());
            println!(
                "{}",
                format_currency_with(amount, ctx.config.display.currency_symbol())
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Alert { message, kind } => {
            show_safe_alert(
                &ctx.port,
                message,
                AlertKind::from_str(kind),
                ctx.config.notifications.alert_timings(),
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Caps => {
            let role = ctx.current_role()?;
            let caps = CapabilityResolver::new(role.as_ref()).capabilities();
            apply_capabilities(ctx.port.as_ref(), caps);

            match &role {
                Some(role) => println!("User: {} ({})", role.username, role.role),
                None => println!("User: <none>"),
            }
            println!("{}", serde_json::to_string_pretty(&caps)?);
            let actions: Vec<&str> = row_actions(caps).iter().map(|a| a.title()).collect();
            if !actions.is_empty() {
                println!("Row actions: {}", actions.join(", "));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Edit { item_type, item_id } => {
            let role = ctx.current_role()?;
            let dispatcher = ActionDispatcher::new(Arc::clone(&ctx.port))
                .with_success_timings(ctx.config.notifications.success_timings());
            Ok(outcome_code(dispatcher.edit_item(role.as_ref(), item_id, item_type)))
        }
        Command::Delete { item_type, item_id } => {
            let role = ctx.current_role()?;
            let dispatcher = ActionDispatcher::new(Arc::clone(&ctx.port))
                .with_success_timings(ctx.config.notifications.success_timings());
            Ok(outcome_code(dispatcher.delete_item(role.as_ref(), item_id, item_type)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn context_with_store(contents: Option<&str>) -> (Context, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.json");
        if let Some(contents) = contents {
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(contents.as_bytes()).unwrap();
        }
        let mut config = Config::default();
        config.permissions.store_path = Some(path);
        (Context::new(config, true).unwrap(), dir)
    }

    #[test]
    fn test_check_exit_codes() {
        let (ctx, _dir) = context_with_store(None);
        let ok = run(
            &ctx,
            &Command::Check {
                field: Field::NationalId,
                value: "1234567890".to_string(),
            },
        )
        .unwrap();
        assert_eq!(ok, ExitCode::SUCCESS);

        let bad = run(
            &ctx,
            &Command::Check {
                field: Field::Url,
                value: "javascript:alert(1)".to_string(),
            },
        )
        .unwrap();
        assert_eq!(bad, ExitCode::FAILURE);
    }

    #[test]
    fn test_delete_denied_without_stored_role() {
        let (ctx, _dir) = context_with_store(None);
        let code = run(
            &ctx,
            &Command::Delete {
                item_type: "sticker".to_string(),
                item_id: "3".to_string(),
            },
        )
        .unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_edit_allowed_for_stored_editor() {
        let (ctx, _dir) = context_with_store(Some(
            r#"{"currentUser": {"username": "sara", "role": "officer", "permissions": ["edit"]}}"#,
        ));
        let code = run(
            &ctx,
            &Command::Edit {
                item_type: "resident".to_string(),
                item_id: "12".to_string(),
            },
        )
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_malformed_store_is_error() {
        let (ctx, _dir) = context_with_store(Some("not json"));
        assert!(run(&ctx, &Command::Caps).is_err());
    }
}
