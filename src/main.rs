mod cli;
mod config;
mod store;
mod summary;
mod util;

use std::path::Path;
use std::process;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use cli::CliError;
use config::{Config, Credentials};
use store::{FileStore, HttpStore, Store};
use util::{Amount, Date, NewTransaction};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let matches = App::new("soldo")
        .version("0.1.0")
        .about("Personal finance tracking and dashboards from the command line")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("dashboard")
                .about("Summarize your finances as chart-ready series")
                .arg(
                    Arg::with_name("file")
                        .long("file")
                        .takes_value(true)
                        .value_name("PATH")
                        .help("Read records from a JSON snapshot instead of the backend"),
                )
                .arg(
                    Arg::with_name("as-of")
                        .long("as-of")
                        .takes_value(true)
                        .value_name("DATE")
                        .help("Reference date (YYYY-MM-DD), defaults to today"),
                )
                .arg(
                    Arg::with_name("expense-days")
                        .long("expense-days")
                        .takes_value(true)
                        .value_name("N")
                        .help("Length of the trailing daily expense window (default 30)"),
                )
                .arg(
                    Arg::with_name("income-days")
                        .long("income-days")
                        .takes_value(true)
                        .value_name("N")
                        .help("Length of the trailing income-by-category window (default 60)"),
                )
                .arg(
                    Arg::with_name("json")
                        .long("json")
                        .help("Print the chart-ready JSON instead of tables"),
                )
                .arg(
                    Arg::with_name("svg")
                        .long("svg")
                        .takes_value(true)
                        .value_name("PATH")
                        .help("Also render the daily expense series as an SVG bar chart"),
                ),
        )
        .subcommand(record_commands("income", "Track income records", true))
        .subcommand(record_commands("expense", "Track expense records", false))
        .subcommand(
            SubCommand::with_name("login")
                .about("Store the backend bearer token")
                .arg(
                    Arg::with_name("token")
                        .long("token")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("api-base")
                        .long("api-base")
                        .takes_value(true)
                        .value_name("URL"),
                ),
        )
        .subcommand(SubCommand::with_name("logout").about("Forget the stored token"))
        .get_matches();

    if let Err(err) = dispatch(&matches) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn record_commands<'a, 'b>(name: &'static str, about: &'static str, income: bool) -> App<'a, 'b> {
    let add = SubCommand::with_name("add")
        .about("Record a transaction")
        .arg(
            Arg::with_name("amount")
                .long("amount")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("description")
                .long("description")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("date")
                .long("date")
                .takes_value(true)
                .value_name("DATE")
                .help("Defaults to today"),
        )
        .arg(Arg::with_name("category").long("category").takes_value(true));
    let add = if income {
        add.arg(Arg::with_name("source").long("source").takes_value(true))
    } else {
        add.arg(
            Arg::with_name("method")
                .long("method")
                .takes_value(true)
                .help("Payment method"),
        )
    };
    SubCommand::with_name(name)
        .about(about)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(SubCommand::with_name("ls").about("List records"))
        .subcommand(add)
        .subcommand(
            SubCommand::with_name("rm")
                .about("Delete a record")
                .arg(Arg::with_name("id").required(true)),
        )
        .subcommand(
            SubCommand::with_name("export")
                .about("Download the spreadsheet export")
                .arg(
                    Arg::with_name("out")
                        .long("out")
                        .takes_value(true)
                        .value_name("PATH"),
                ),
        )
}

fn dispatch(matches: &ArgMatches) -> Result<(), CliError> {
    match matches.subcommand() {
        ("dashboard", Some(sub)) => run_dashboard(sub),
        ("income", Some(sub)) => run_records(sub, Kind::Income),
        ("expense", Some(sub)) => run_records(sub, Kind::Expense),
        ("login", Some(sub)) => run_login(sub),
        ("logout", _) => {
            config::delete_credentials().map_err(CliError::Config)?;
            println!("logged out");
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn run_dashboard(sub: &ArgMatches) -> Result<(), CliError> {
    let now = match sub.value_of("as-of") {
        Some(raw) => raw
            .parse::<Date>()
            .map_err(|e| CliError::Arg(format!("--as-of: {}", e)))?,
        None => Date::today(),
    };
    let expense_days = parse_days(sub, "expense-days", summary::EXPENSE_WINDOW_DAYS)?;
    let income_days = parse_days(sub, "income-days", summary::INCOME_WINDOW_DAYS)?;
    let json = sub.is_present("json");
    let svg = sub.value_of("svg").map(Path::new);
    match sub.value_of("file") {
        Some(path) => {
            let store = FileStore::open(Path::new(path))?;
            cli::dashboard(&store, now, expense_days, income_days, json, svg)
        }
        None => {
            let store = HttpStore::from_config(&Config::resolve());
            cli::dashboard(&store, now, expense_days, income_days, json, svg)
        }
    }
}

fn parse_days(sub: &ArgMatches, name: &str, default: usize) -> Result<usize, CliError> {
    match sub.value_of(name) {
        None => Ok(default),
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            CliError::Arg(format!("--{} expects a number of days, got '{}'", name, raw))
        }),
    }
}

#[derive(Clone, Copy)]
enum Kind {
    Income,
    Expense,
}

fn run_records(sub: &ArgMatches, kind: Kind) -> Result<(), CliError> {
    let store = HttpStore::from_config(&Config::resolve());
    match sub.subcommand() {
        ("ls", _) => {
            let records = match kind {
                Kind::Income => store.income(),
                Kind::Expense => store.expenses(),
            }?;
            cli::listing(&records);
            Ok(())
        }
        ("add", Some(args)) => {
            let amount = args
                .value_of("amount")
                .unwrap()
                .parse::<Amount>()
                .map_err(|e| CliError::Arg(e.to_string()))?;
            let date = match args.value_of("date") {
                Some(raw) => raw
                    .parse::<Date>()
                    .map_err(|e| CliError::Arg(format!("--date: {}", e)))?,
                None => Date::today(),
            };
            let default_category = match kind {
                Kind::Income => "Salary",
                Kind::Expense => "Other",
            };
            let tx = NewTransaction {
                description: args.value_of("description").unwrap_or("").to_string(),
                amount,
                date,
                category: args.value_of("category").unwrap_or(default_category).to_string(),
                source: args.value_of("source").map(str::to_string),
                payment_method: args.value_of("method").map(str::to_string),
            };
            match kind {
                Kind::Income => store.add_income(&tx),
                Kind::Expense => store.add_expense(&tx),
            }?;
            println!("recorded {} on {}", tx.amount, tx.date);
            Ok(())
        }
        ("rm", Some(args)) => {
            let id = args.value_of("id").unwrap();
            match kind {
                Kind::Income => store.remove_income(id),
                Kind::Expense => store.remove_expense(id),
            }?;
            println!("removed {}", id);
            Ok(())
        }
        ("export", Some(args)) => {
            let bytes = match kind {
                Kind::Income => store.export_income(),
                Kind::Expense => store.export_expense(),
            }?;
            let default_name = match kind {
                Kind::Income => "income.xlsx",
                Kind::Expense => "expense.xlsx",
            };
            let out = args.value_of("out").unwrap_or(default_name);
            cli::save_export(&bytes, Path::new(out))
        }
        _ => unreachable!(),
    }
}

fn run_login(sub: &ArgMatches) -> Result<(), CliError> {
    let creds = Credentials {
        token: sub.value_of("token").unwrap().to_string(),
        api_base: sub.value_of("api-base").map(str::to_string),
    };
    config::save_credentials(&creds).map_err(CliError::Config)?;
    println!("token saved");
    Ok(())
}
