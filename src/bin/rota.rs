extern crate rota as lib;

use chrono::NaiveDate;
use flexi_logger::{FileSpec, Logger};
use lib::app::App;
use lib::datetime::MonthIndex;
use lib::error::{Error, ErrorKind};
use lib::events::Dispatcher;
use lib::feed::Feed;
use nix::sys::termios;
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "rota",
    about = "Staff calendar merging events, meetings, shifts and absences."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        long = "data",
        help = "data file overriding the configured one",
        parse(from_os_str)
    )]
    pub data: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only show calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "today", help = "pretend today is YYYY-MM-DD")]
    pub today: Option<NaiveDate>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let data = args.data.or_else(|| config.data.clone()).ok_or_else(|| {
        Error::new(
            ErrorKind::MissingData,
            "pass --data or set 'data' in the config file",
        )
    })?;

    let today = args.today.unwrap_or_else(|| config.timezone.today());
    if !MonthIndex::from(today).is_supported() {
        return Err(Error::new(
            ErrorKind::DateParse,
            &format!("{} is outside the supported calendar range", today),
        )
        .into());
    }

    let provider = lib::provider::load_provider(&data)?;
    let feed = Feed::from_config(&config, provider);

    let mut app = App::new(&config, feed, today);

    if args.show {
        app.load();
        print!("{}", app.render());
        return Ok(());
    }

    const STDOUT: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDOUT)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDOUT, termios::SetArg::TCSANOW, &attr);
        }

        println!("rota ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let dispatcher = Dispatcher::from_config(&config);
    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    app.run(dispatcher, term)
}
