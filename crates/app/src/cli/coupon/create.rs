use bazaar::{
    coupons::{CouponCode, CouponTerms},
    discounts::{DiscountTerms, DiscountType},
};
use bazaar_app::{
    database::{self, Db},
    domain::coupons::{
        CouponsService, PgCouponsService,
        data::{CouponApplicability, NewCoupon},
        records::CouponUuid,
    },
};
use clap::Args;
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct CreateCouponArgs {
    /// Coupon code; stored uppercased
    #[arg(long)]
    code: String,

    /// `percentage` or `fixed`
    #[arg(long = "type")]
    discount_type: DiscountType,

    /// Percentage points or flat amount
    #[arg(long)]
    value: Decimal,

    /// Cap on percentage discounts
    #[arg(long)]
    max_discount: Option<Decimal>,

    /// Smallest subtotal the coupon applies to
    #[arg(long, default_value = "0")]
    min_order: Decimal,

    /// Total redemptions allowed; unlimited when omitted
    #[arg(long)]
    usage_limit: Option<u32>,

    /// Start of the validity window; defaults to now
    #[arg(long)]
    starts_at: Option<Timestamp>,

    /// End of the validity window; defaults to 30 days after the start
    #[arg(long)]
    ends_at: Option<Timestamp>,

    #[arg(long)]
    description: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateCouponArgs) -> Result<(), String> {
    let code = CouponCode::parse(&args.code).map_err(|error| error.to_string())?;
    let starts_at = args.starts_at.unwrap_or_else(Timestamp::now);
    let ends_at = args
        .ends_at
        .unwrap_or_else(|| starts_at + SignedDuration::from_hours(24 * 30));

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgCouponsService::new(Db::new(pool));

    let coupon = service
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code,
            description: args.description,
            terms: CouponTerms {
                discount: DiscountTerms {
                    discount_type: args.discount_type,
                    value: args.value,
                    max_amount: args.max_discount,
                },
                min_order_amount: args.min_order,
                usage_limit: args.usage_limit,
                usage_per_customer: 1,
                starts_at,
                ends_at,
                is_active: true,
            },
            applicability: CouponApplicability::default(),
        })
        .await
        .map_err(|error| format!("failed to create coupon: {error}"))?;

    println!("coupon_uuid: {}", coupon.uuid);
    println!("coupon_code: {}", coupon.coupon.code);
    println!("valid: {starts_at} .. {ends_at}");

    Ok(())
}
