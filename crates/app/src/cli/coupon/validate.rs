use bazaar::coupons::{CouponCode, CouponValidation};
use bazaar_app::{
    database::{self, Db},
    domain::coupons::{CouponsService, PgCouponsService},
};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct ValidateCouponArgs {
    /// Coupon code to check
    #[arg(long)]
    code: String,

    /// Order subtotal to check against
    #[arg(long)]
    subtotal: Decimal,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ValidateCouponArgs) -> Result<(), String> {
    let code = CouponCode::parse(&args.code).map_err(|error| error.to_string())?;

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let validation = PgCouponsService::new(Db::new(pool))
        .validate_coupon(code, args.subtotal)
        .await
        .map_err(|error| format!("failed to validate coupon: {error}"))?;

    match validation {
        CouponValidation::Accepted(summary) => {
            println!("valid: true");
            println!("discount_type: {}", summary.discount_type);
            println!("discount: {}", summary.discount);
        }
        CouponValidation::Rejected(rejection) => {
            println!("valid: false");
            println!("error: {rejection}");
        }
    }

    Ok(())
}
