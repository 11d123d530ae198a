mod command;
mod render;

use std::fmt;
use std::time::Duration;

use exam_core::model::ExamId;
use exam_core::time::format_countdown;
use services::{AppServices, Clock, IntervalScheduler, Phase, SessionController, TickOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};

use command::Command;

const DEFAULT_TICK_MS: u64 = 1_000;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidExamId { raw: String },
    InvalidTick { raw: String },
    Conflict,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidExamId { raw } => write!(f, "invalid --exam value: {raw}"),
            ArgsError::InvalidTick { raw } => write!(f, "invalid --tick-ms value: {raw}"),
            ArgsError::Conflict => write!(f, "--exam and --topic are mutually exclusive"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--exam <id> | --topic <text>] [--tick-ms <n>]");
    eprintln!("  cargo run -p app -- catalog");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --tick-ms {DEFAULT_TICK_MS}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_TICK_MS, EXAM_AI_API_KEY, EXAM_AI_BASE_URL, EXAM_AI_MODEL, RUST_LOG");
}

/// How the session should begin.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Launch {
    Dashboard,
    Exam(ExamId),
    Topic(String),
}

#[derive(Debug)]
struct Args {
    launch: Launch,
    tick: Duration,
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        env_tick: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut args = args.into_iter();
        let mut launch = Launch::Dashboard;
        let mut tick_ms = env_tick
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TICK_MS);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--exam" => {
                    let value = require_value(&mut args, "--exam")?;
                    let id = value
                        .parse::<ExamId>()
                        .map_err(|_| ArgsError::InvalidExamId { raw: value.clone() })?;
                    if matches!(launch, Launch::Topic(_)) {
                        return Err(ArgsError::Conflict);
                    }
                    launch = Launch::Exam(id);
                }
                "--topic" => {
                    let value = require_value(&mut args, "--topic")?;
                    if matches!(launch, Launch::Exam(_)) {
                        return Err(ArgsError::Conflict);
                    }
                    launch = Launch::Topic(value);
                }
                "--tick-ms" => {
                    let value = require_value(&mut args, "--tick-ms")?;
                    tick_ms = value
                        .parse::<u64>()
                        .ok()
                        .filter(|ms| *ms > 0)
                        .ok_or(ArgsError::InvalidTick { raw: value })?;
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            launch,
            tick: Duration::from_millis(tick_ms),
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout belongs to the exam screen.
    let stderr_layer = log_fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    match argv.first().map(String::as_str) {
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some("catalog") => {
            render::catalog_list();
            return Ok(());
        }
        _ => {}
    }

    let args = Args::parse(argv, std::env::var("EXAM_TICK_MS").ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    let services = AppServices::from_env(Clock::default_clock());
    if !services.ai_enabled() {
        tracing::info!("EXAM_AI_API_KEY not set; generation and coaching are unavailable");
    }
    let (scheduler, mut ticks) = IntervalScheduler::new(args.tick);
    let mut session = services.controller(Box::new(scheduler));

    match args.launch {
        Launch::Dashboard => show_dashboard(&services),
        Launch::Exam(id) => {
            execute(&services, &mut session, Command::Start(id)).await;
        }
        Launch::Topic(topic) => {
            execute(&services, &mut session, Command::Generate(topic)).await;
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => on_tick(&mut session, tick),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(session.phase(), &line) {
                    Ok(command) => {
                        if execute(&services, &mut session, command).await == Flow::Quit {
                            break;
                        }
                    }
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
    }

    if session.phase() == Phase::InExam {
        report(session.abandon_exam());
    }
    Ok(())
}

fn on_tick(session: &mut SessionController, tick: services::Tick) {
    match session.handle_tick(tick) {
        Ok(TickOutcome::Running { remaining_secs }) => {
            if remaining_secs % 60 == 0 || remaining_secs <= 10 {
                println!("  {} remaining", format_countdown(remaining_secs));
            }
        }
        Ok(TickOutcome::Expired(_)) => {
            println!("Time is up! Your answers were submitted.");
            show_result(session);
        }
        Ok(TickOutcome::Ignored) => {}
        Err(err) => {
            eprintln!("{err}");
            show_result(session);
        }
    }
}

/// Run one command. Failures are reported and the loop keeps going.
async fn execute(
    services: &AppServices,
    session: &mut SessionController,
    command: Command,
) -> Flow {
    let flow = services.flow();
    match command {
        Command::Help => render::help(session.phase()),
        Command::Quit => return Flow::Quit,

        Command::Catalog => render::catalog_list(),
        Command::Start(id) => match flow.start_from_catalog(session, id) {
            Ok(()) => render::question(session),
            Err(err) => eprintln!("{err}"),
        },
        Command::Generate(topic) => {
            println!("Generating an exam about \"{topic}\"...");
            match flow.generate_and_start(session, &topic).await {
                Ok(()) => render::question(session),
                Err(err) => eprintln!("Failed to generate exam: {err}"),
            }
        }
        Command::History(filter) => {
            if let Some(attempts) = report(services.history().list(filter)) {
                render::history(&attempts);
            }
        }

        Command::Select(option) => {
            report(session.select_current(option));
            render::question(session);
        }
        Command::Next => {
            report(session.next());
            render::question(session);
        }
        Command::Previous => {
            report(session.previous());
            render::question(session);
        }
        Command::Goto(target) => {
            report(session.navigate(target));
            render::question(session);
        }
        Command::Status => render::status(session),
        Command::Submit => {
            if let Some(progress) = session.progress() {
                if progress.unanswered > 0 {
                    println!("Submitting with {} unanswered question(s).", progress.unanswered);
                }
            }
            report(session.submit());
            show_result(session);
        }
        Command::Abandon => {
            if report(session.abandon_exam()).is_some() {
                show_dashboard(services);
            }
        }

        Command::Review => {
            if let Some(summary) = session.result_summary() {
                render::review(session, &summary);
            }
        }
        Command::Feedback => {
            println!("Asking the study coach...");
            if let Some(text) = report(flow.fetch_feedback(session).await) {
                println!();
                println!("{text}");
            }
        }
        Command::Dashboard => {
            if report(session.return_to_dashboard()).is_some() {
                show_dashboard(services);
            }
        }
    }
    Flow::Continue
}

/// Print a failed result to stderr, keeping the value on success.
fn report<T, E: fmt::Display>(result: Result<T, E>) -> Option<T> {
    result.map_err(|err| eprintln!("{err}")).ok()
}

fn show_dashboard(services: &AppServices) {
    let history = services.history();
    let (Some(stats), Some(latest)) = (report(history.stats(None)), report(history.latest()))
    else {
        return;
    };
    render::dashboard(&stats, latest.as_ref());
}

fn show_result(session: &SessionController) {
    if let Some(summary) = session.result_summary() {
        render::result(&summary);
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
