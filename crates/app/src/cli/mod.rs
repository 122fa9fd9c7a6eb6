//! Admin commands: coupon bootstrap and validation, schema migration.

use clap::{Parser, Subcommand};

mod coupon;
mod db;

#[derive(Debug, Parser)]
#[command(name = "bazaar-app", about = "Bazaar CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Coupon(coupon::CouponCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Coupon(command) => coupon::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_coupon_create() -> TestResult {
        let cli = Cli::try_parse_from([
            "bazaar-app",
            "coupon",
            "create",
            "--code",
            "save10",
            "--type",
            "percentage",
            "--value",
            "10",
            "--max-discount",
            "500",
            "--database-url",
            "postgres://db/bazaar",
        ])?;

        assert!(
            matches!(cli.command, Commands::Coupon(_)),
            "expected the coupon command"
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_discount_type() {
        let result = Cli::try_parse_from([
            "bazaar-app",
            "coupon",
            "create",
            "--code",
            "SAVE10",
            "--type",
            "bogus",
            "--value",
            "10",
            "--database-url",
            "postgres://db/bazaar",
        ]);

        assert!(result.is_err(), "unknown discount type should fail to parse");
    }

    #[test]
    fn parses_coupon_validate() -> TestResult {
        let cli = Cli::try_parse_from([
            "bazaar-app",
            "coupon",
            "validate",
            "--code",
            "SAVE10",
            "--subtotal",
            "120.50",
            "--database-url",
            "postgres://db/bazaar",
        ])?;

        assert!(
            matches!(cli.command, Commands::Coupon(_)),
            "expected the coupon command"
        );

        Ok(())
    }
}
