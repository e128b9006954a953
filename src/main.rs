use anyhow::Context;
use chore_week::config::cli::{CliArgs, Command};
use chore_week::utils::error::ErrorSeverity;
use chore_week::utils::logger::{self, LogFormat};
use chore_week::utils::validation::Validate;
use chore_week::{
    parse_picker_value, resolve_week_start_str, ChoreWeekConfig, ChoreWeekError, ConfigProvider,
    SystemClock, WeekPicker, WeekQuery, WeekRange,
};
use clap::Parser;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = ChoreWeekConfig::load(args.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", args.config))?;

    // 初始化日誌
    logger::init_logger(
        config.log_level(),
        LogFormat::from_name(config.log_format()),
        args.verbose,
    );

    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    if let Err(e) = run(&args, &config) {
        exit_with(&e);
    }

    Ok(())
}

fn run(args: &CliArgs, config: &ChoreWeekConfig) -> chore_week::Result<()> {
    match &args.command {
        Command::Resolve { dates } => {
            let mut resolved = Vec::with_capacity(dates.len());
            for date in dates {
                resolved.push((date.as_str(), resolve_week_start_str(date)?));
            }

            if args.json {
                let rows: Vec<_> = resolved
                    .iter()
                    .map(|(input, monday)| json!({ "input": input, "start_of_week": monday }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (_, monday) in resolved {
                    println!("{}", monday);
                }
            }
        }
        Command::Range { value } => {
            let week = WeekRange::containing(parse_picker_value(value)?)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&week)?);
            } else {
                println!("{} {}", week.start(), week.end());
            }
        }
        Command::Query { value } => {
            let mut picker = WeekPicker::new();
            let query = picker.on_change(value)?;
            print_query(&query, args.json)?;
        }
        Command::ThisWeek => {
            let clock = SystemClock::new(config.clock_policy());
            tracing::debug!(policy = %clock.policy(), "Reading today's date");
            let query = WeekQuery::current(&clock)?;
            print_query(&query, args.json)?;
        }
    }

    Ok(())
}

fn print_query(query: &WeekQuery, as_json: bool) -> chore_week::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(query)?);
    } else {
        println!("{}", query.to_query_string());
    }
    Ok(())
}

fn exit_with(e: &ChoreWeekError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
