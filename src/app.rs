use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::api::{ClientOptions, HttpApi};
use crate::board::filter::FilterCriteria;
use crate::board::store::{LoadOutcome, Notice, NoticeLevel, TargetStore};
use crate::board::validate::{reason_counter_level, CounterLevel, TargetForm, MAX_REASON_CHARS};
use crate::cli::args::{AddArgs, CliArgs, Command, ListArgs, RoleArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::effects::{NoEffects, ParticleEffects};
use crate::error::BoardError;
use crate::gallery;
use crate::output::report::{self, RenderOptions};
use crate::output::{self, OutputFormat};
use crate::prompt::{AssumeYes, Confirm, StdinConfirm};
use crate::role::RoleStyle;

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn flag_label(arg: &clap::Arg) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(short) = arg.get_short() {
        parts.push(format!("-{short}"));
    }
    if let Some(long) = arg.get_long() {
        parts.push(format!("--{long}"));
    }
    for alias in arg.get_visible_aliases().unwrap_or_default() {
        parts.push(format!("--{alias}"));
    }
    let mut label = parts.join(", ");
    if arg.get_action().takes_values() {
        let value_name = arg
            .get_value_names()
            .and_then(|names| names.first())
            .map(|name| name.as_str())
            .unwrap_or("VALUE");
        label.push_str(&format!(" <{value_name}>"));
    }
    label
}

/// Top-level help: commands first, then global flags grouped by heading.
fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let name = cmd.get_name();
    let mut out = format!("{name} {}\n", cmd.get_version().unwrap_or_default());
    if let Some(long_about) = cmd.get_long_about().or_else(|| cmd.get_about()) {
        out.push_str(&format!("{long_about}\n"));
    }
    out.push_str(&format!("\nUsage: {name} [OPTIONS] <COMMAND>\n\nCommands:\n"));
    for sub in cmd.get_subcommands() {
        let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
        out.push_str(&format!("  {:<16}{}\n", sub.get_name(), about.trim()));
    }

    let mut sections: Vec<(&str, Vec<&clap::Arg>)> = Vec::new();
    for arg in cmd.get_arguments().filter(|a| !a.is_hide_set()) {
        let heading = arg.get_help_heading().unwrap_or("Options");
        match sections.iter_mut().find(|(h, _)| *h == heading) {
            Some((_, args)) => args.push(arg),
            None => sections.push((heading, vec![arg])),
        }
    }
    for (heading, args) in sections {
        out.push_str(&format!("\n{heading}:\n"));
        for arg in args {
            out.push_str(&format!("  {}\n", flag_label(arg)));
            if let Some(help) = arg.get_help().map(|h| h.to_string()) {
                if !help.trim().is_empty() {
                    out.push_str(&format!("          {}\n", help.trim()));
                }
            }
        }
    }

    out.push_str(&format!("\nRun '{name} <COMMAND> --help' for command options.\n"));
    out
}

#[derive(Clone, Debug)]
struct RunConfig {
    command: Command,
    client: ClientOptions,
    admin: bool,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
    fallback_on_error: bool,
    assume_yes: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let command = args
        .command
        .clone()
        .ok_or_else(|| "no command given, see --help".to_string())?;

    let defaults = ClientOptions::default();
    let client = ClientOptions {
        base_url: args
            .base_url
            .or(cfg.base_url)
            .unwrap_or(defaults.base_url),
        timeout_seconds: args
            .timeout
            .or(cfg.timeout)
            .unwrap_or(defaults.timeout_seconds),
        proxy: args.proxy.or(cfg.proxy),
        cookie: args.cookie.or(cfg.cookie),
    };

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let fallback_on_error = !args.no_fallback && cfg.fallback_on_error.unwrap_or(true);

    let (list_output, list_format, list_admin) = match &command {
        Command::List(list) => (list.output.clone(), list.format.clone(), list.admin),
        _ => (None, None, false),
    };
    let admin = list_admin || cfg.admin.unwrap_or(false);
    let output = list_output.or(cfg.output);
    let output_format = match list_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or html"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    Ok(RunConfig {
        command,
        client,
        admin,
        output,
        output_format,
        no_color,
        fallback_on_error,
        assume_yes: args.yes,
        verbose: args.verbose,
    })
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,targetboard={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => eprintln!("{} {}", "[+]".bold().green(), notice.message),
            NoticeLevel::Error => eprintln!("{} {}", "[-]".bold().red(), notice.message),
            NoticeLevel::Info => eprintln!("{} {}", "[*]".bold().blue(), notice.message),
        }
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} [{elapsed_precise}]")
            .map_err(|e| format!("failed to build spinner style: {e}"))?,
    );
    pb.set_message(message);
    Ok(pb)
}

fn build_api(options: &ClientOptions) -> Result<HttpApi, String> {
    let api = HttpApi::new(options).map_err(|e| e.to_string())?;
    debug!(base = %api.base_url(), "api client ready");
    Ok(api)
}

fn confirmer(assume_yes: bool) -> Box<dyn Confirm + Send + Sync> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    }
}

async fn write_output(path: Option<&str>, bytes: &[u8]) -> Result<(), String> {
    match path {
        Some(path) => {
            let path = config::expand_tilde(path);
            let mut file = tokio::fs::File::create(&path)
                .await
                .map_err(|e| format!("failed to create output file '{}': {e}", path.display()))?;
            file.write_all(bytes)
                .await
                .map_err(|e| format!("failed to write output file '{}': {e}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "wrote output");
            Ok(())
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(bytes)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))
        }
    }
}

fn criteria_from(list: &ListArgs) -> FilterCriteria {
    FilterCriteria {
        gamemode: list.gamemode.clone(),
        priority: list.priority.clone(),
        search: list.search.clone(),
        tags: list.tags.clone(),
    }
}

fn form_from(add: AddArgs) -> TargetForm {
    TargetForm {
        nickname: add.nickname,
        gamemode: add.gamemode,
        server: add.server,
        priority: add.priority,
        tags: add.tags,
        reason: add.reason,
        description: add.description,
    }
}

fn style_from(role: &RoleArgs) -> RoleStyle {
    RoleStyle {
        color: role.color.clone(),
        gradient: role.gradient,
        gradient_start: role.gradient_start.clone(),
        gradient_end: role.gradient_end.clone(),
        background: role.background.clone(),
        glow: role.glow,
        glow_color: role.glow_color.clone(),
        shadow: role.shadow,
        shadow_color: role.shadow_color.clone(),
        border: role.border,
        border_color: role.border_color.clone(),
        font_weight: role.font_weight.clone(),
        font_style: role.font_style.clone(),
        text_transform: role.text_transform.clone(),
        animated: role.animated,
        animation_speed: role.animation_speed.clone(),
    }
}

/// Turns a failed action into the CLI error; a declined prompt is not an error.
fn action_result(result: Result<(), BoardError>) -> Result<(), String> {
    match result {
        Ok(()) => Ok(()),
        Err(BoardError::Declined) => {
            eprintln!("{} cancelled", "[*]".bold().blue());
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    if run.verbose > 0 {
        format_kv_line("Server", &run.client.base_url);
        format_kv_line("Timeout", &format!("{}s", run.client.timeout_seconds));
    }

    match run.command.clone() {
        Command::RolePreview(role) => {
            let html = style_from(&role).render_preview(&role.text, &role.emoji);
            write_output(None, format!("{html}\n").as_bytes()).await
        }
        Command::List(list) => {
            let api = build_api(&run.client)?;
            let mut store = TargetStore::new(api, confirmer(run.assume_yes), NoEffects)
                .with_fallback(run.fallback_on_error);
            let pb = spinner("loading targets")?;
            let outcome = store.load().await;
            pb.finish_and_clear();
            print_notices(store.take_notices());
            if outcome == LoadOutcome::Failed {
                return Err("could not load targets".to_string());
            }
            let view = store.apply_filters(criteria_from(&list)).to_vec();
            let bytes = match run.output_format {
                OutputFormat::Text => output::render_text(&view),
                OutputFormat::Json => output::render_json(&view, &store.statistics()),
                OutputFormat::Html => {
                    let board = store.render(&RenderOptions {
                        is_admin: run.admin,
                    });
                    report::render_page(&board, &store.statistics(), &[]).into_bytes()
                }
            };
            write_output(run.output.as_deref(), &bytes).await
        }
        Command::Stats => {
            let api = build_api(&run.client)?;
            let mut store = TargetStore::new(api, confirmer(run.assume_yes), NoEffects)
                .with_fallback(run.fallback_on_error);
            let pb = spinner("loading targets")?;
            let outcome = store.load().await;
            pb.finish_and_clear();
            print_notices(store.take_notices());
            if outcome == LoadOutcome::Failed {
                return Err("could not load targets".to_string());
            }
            write_output(None, output::render_stats_text(&store.statistics()).as_bytes()).await
        }
        Command::Add(add) => {
            let api = build_api(&run.client)?;
            let mut store =
                TargetStore::new(api, confirmer(run.assume_yes), ParticleEffects::new())
                    .with_fallback(false);
            let form = form_from(add);
            match reason_counter_level(&form.reason) {
                CounterLevel::Normal => {}
                CounterLevel::Warning => eprintln!(
                    "{} reason: {}/{MAX_REASON_CHARS}",
                    "[*]".bold().yellow(),
                    form.reason.chars().count()
                ),
                CounterLevel::Danger => eprintln!(
                    "{} reason: {}/{MAX_REASON_CHARS}",
                    "[*]".bold().red(),
                    form.reason.chars().count()
                ),
            }
            let result = store.create(&form).await;
            print_notices(store.take_notices());
            action_result(result)
        }
        Command::Remove { id } => {
            let api = build_api(&run.client)?;
            let mut store =
                TargetStore::new(api, confirmer(run.assume_yes), ParticleEffects::new())
                    .with_fallback(false);
            let result = store.remove(id).await.map(|_| ());
            print_notices(store.take_notices());
            action_result(result)
        }
        Command::Complete { id } => {
            let api = build_api(&run.client)?;
            let mut store =
                TargetStore::new(api, confirmer(run.assume_yes), ParticleEffects::new())
                    .with_fallback(false);
            let result = store.complete(id).await.map(|_| ());
            print_notices(store.take_notices());
            action_result(result)
        }
        Command::GalleryDelete { filename } => {
            let api = build_api(&run.client)?;
            let confirm = confirmer(run.assume_yes);
            match gallery::delete_image(&api, &confirm, &filename).await {
                Ok(notice) => {
                    print_notices(vec![notice]);
                    Ok(())
                }
                Err(BoardError::Declined) => action_result(Err(BoardError::Declined)),
                Err(e) => {
                    print_notices(vec![Notice {
                        level: NoticeLevel::Error,
                        message: gallery::failure_message(&e),
                    }]);
                    Err(e.to_string())
                }
            }
        }
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp if std::env::args().len() <= 2 => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "cannot determine home directory for config".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!("wrote default config to {}", path.display());
        } else {
            println!("config already exists at {}", path.display());
        }
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
