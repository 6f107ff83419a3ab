use crate::demo::{run_approval, run_demo, run_report, ApprovalArgs, DemoArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use treasury_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Treasury Desk",
    about = "Run the business-banking rule engine as a service or explore it from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Show which approval tier a payment amount falls into
    Approval(ApprovalArgs),
    /// Print ratios, the health score and a cash-flow forecast
    Report(ReportArgs),
    /// Walk through approvals, scoring, forecasting and the document checklist
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Approval(args) => run_approval(args),
        Command::Report(args) => run_report(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_a_subcommand() {
        let cli = Cli::try_parse_from(["treasury-desk-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn approval_accepts_formatted_amounts() {
        let cli = Cli::try_parse_from(["treasury-desk-api", "approval", "--amount", "$12,500"])
            .expect("parses");
        match cli.command {
            Some(Command::Approval(args)) => assert_eq!(args.amount, 12_500.0),
            other => panic!("expected approval command, got {other:?}"),
        }
    }

    #[test]
    fn report_rejects_out_of_range_horizons() {
        let error = Cli::try_parse_from(["treasury-desk-api", "report", "--horizon-days", "0"])
            .expect_err("zero horizon rejected");
        assert!(error.to_string().contains("horizon"));
    }
}
