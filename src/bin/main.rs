use clap::Parser;
use relish_notifier::{
    interrupt, Credentials, Interrupt, LocalClock, Notifier, OrderSite, Outcome, Poller,
    RelishSite, Settings,
};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "relish-notifier")]
#[command(about = "Watch a Relish lunch order and exit when it arrives")]
#[command(version)]
struct Cli {
    /// YAML settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run Chrome in headless mode (default)
    #[arg(long, overrides_with = "no_headless")]
    headless: bool,

    /// Show the browser window
    #[arg(long, overrides_with = "headless")]
    no_headless: bool,

    /// Seconds to wait for page elements
    #[arg(short = 't', long, value_name = "SECS")]
    page_timeout: Option<u64>,

    /// Seconds between status checks
    #[arg(short = 'i', long, value_name = "SECS")]
    check_interval: Option<u64>,

    /// Check once and exit
    #[arg(long)]
    once: bool,

    /// Run this command when the order has arrived
    #[arg(short, long)]
    command: Option<String>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn settings(&self) -> relish_notifier::Result<Settings> {
        let mut settings = match self.config {
            Some(ref path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if self.no_headless {
            settings.browser.headless = false;
        } else if self.headless {
            settings.browser.headless = true;
        }
        if let Some(secs) = self.page_timeout {
            settings.element_timeout_secs = secs;
        }
        if let Some(secs) = self.check_interval {
            settings.poll_interval_secs = secs;
        }
        if self.once {
            settings.once = true;
        }
        if self.command.is_some() {
            settings.arrival_command = self.command.clone();
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(&cli).await {
        Ok(Outcome::Arrived) | Ok(Outcome::Cancelled) => {}
        Ok(Outcome::NotArrived) => {
            eprintln!("order has not arrived");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> relish_notifier::Result<Outcome> {
    // Credentials first: nothing touches the network without them.
    let credentials = Credentials::from_env()?;
    let settings = cli.settings()?;

    println!("Logging into Relish...");
    let mut site = RelishSite::launch(&settings).await?;
    if let Err(e) = site.login(&credentials).await {
        close(site).await;
        return Err(e);
    }

    println!("Begin lunch status checking...");
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match interrupt(&token) {
                Interrupt::Graceful => {
                    eprintln!("Stopping after the current wait. Press Ctrl-C again to exit now.");
                }
                Interrupt::Force => std::process::exit(130),
            }
        }
    });

    let mut poller = Poller::new(
        site,
        LocalClock,
        std::io::stdout(),
        settings.poll_settings(),
        cancel,
    );
    let result = poller.run().await;
    let site = poller.into_site();

    if let Ok(Outcome::Arrived) = result {
        Notifier::new(settings.arrival_command.clone())
            .on_arrival()
            .await;
    }

    close(site).await;
    result
}

async fn close(site: RelishSite) {
    if let Err(e) = site.close().await {
        warn!("Failed to close browser: {}", e);
    }
}
