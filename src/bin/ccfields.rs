//! CLI tool for payment card field formatting and validation.
//!
//! # Usage
//!
//! ```bash
//! # Format a field the way the engine would while typing
//! ccfields format card 37828224631 --cursor 11
//!
//! # Classify a (partial) number
//! ccfields classify 6011
//!
//! # Luhn checksum of a number
//! ccfields luhn 4111111111111111
//!
//! # Evaluate a whole form
//! ccfields check --card 4111111111111111 --expiry 12/28 --cvv 123 --output json
//! ```
//!
//! Set `RUST_LOG=cc_fields=trace` (or pass `--verbose`) to see the engine's
//! formatting passes and status transitions on stderr.

use std::process::ExitCode;

use cc_fields::mask::{mask_card_number, mask_secret};
use cc_fields::status::DEFAULT_EXPIRY_WINDOW_YEARS;
use cc_fields::{
    detect, luhn, AggregateState, CardFieldState, CvvFieldState, EngineOptions, ExpiryFieldState,
    Field, FixedClock, Formatted, Rules, YearMonth,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ccfields")]
#[command(
    author,
    version,
    about = "As-you-type payment card field formatting and validation"
)]
struct Cli {
    /// Log formatting passes and status transitions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format one field's raw text and remap the caret
    Format {
        /// Field to format (card, expiry or cvv)
        field: Field,

        /// Raw field text as typed
        raw: String,

        /// Caret position in the raw text (defaults to the end)
        #[arg(short, long)]
        cursor: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Classify a card number (or partial number) by brand
    Classify {
        /// Card digits, separators allowed
        digits: String,
    },

    /// Compute the Luhn checksum of a number
    Luhn {
        /// Card number, separators allowed
        number: String,
    },

    /// Mask a card number for display
    Mask {
        /// Card number to mask
        number: String,
    },

    /// Evaluate a complete card form
    Check {
        /// Card number field text
        #[arg(long, default_value = "")]
        card: String,

        /// Expiry field text (MMYY, MM/YY, ...)
        #[arg(long, default_value = "")]
        expiry: String,

        /// Security code field text
        #[arg(long, default_value = "")]
        cvv: String,

        /// Evaluate as of this month (MM/YYYY) instead of the system clock
        #[arg(long)]
        today: Option<YearMonth>,

        /// How many years ahead an expiry date may be
        #[arg(long, default_value_t = DEFAULT_EXPIRY_WINDOW_YEARS)]
        window_years: u32,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct FormatReport {
    field: Field,
    #[serde(flatten)]
    formatted: Formatted,
}

#[derive(Serialize)]
struct CheckReport {
    status: AggregateState,
    masked_card: String,
    card: CardFieldState,
    expiry: ExpiryFieldState,
    cvv: CvvFieldState,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Format {
            field,
            raw,
            cursor,
            output,
        } => cmd_format(field, &raw, cursor, output),
        Commands::Classify { digits } => cmd_classify(&digits),
        Commands::Luhn { number } => cmd_luhn(&number),
        Commands::Mask { number } => cmd_mask(&number),
        Commands::Check {
            card,
            expiry,
            cvv,
            today,
            window_years,
            output,
        } => cmd_check(&card, &expiry, &cvv, today, window_years, output),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "cc_fields=trace" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_format(field: Field, raw: &str, cursor: Option<usize>, output: OutputFormat) -> ExitCode {
    let cursor = cursor.unwrap_or_else(|| raw.chars().count());
    let rules = Rules::default();
    let formatted = match field {
        Field::Card => rules.format_card_number(raw, cursor),
        Field::Expiry => rules.format_expiry(raw, cursor),
        Field::Cvv => rules.format_cvv(raw, cursor),
    };

    match output {
        OutputFormat::Text => {
            println!("Text: {}", formatted.text);
            println!("Cursor: {}", formatted.cursor);
            ExitCode::SUCCESS
        }
        OutputFormat::Json => match print_json(&FormatReport { field, formatted }) {
            Ok(()) => ExitCode::SUCCESS,
            Err(code) => code,
        },
    }
}

fn cmd_classify(digits: &str) -> ExitCode {
    let digits = cc_fields::digits::extract_digits(digits);
    let label = detect::classify(&digits);
    let is_amex = detect::is_probably_amex(&digits);

    if label.is_empty() {
        println!("Brand: (no digits)");
    } else {
        println!("Brand: {}", label);
    }
    println!("Amex: {}", if is_amex { "yes" } else { "no" });
    println!("Max digits: {}", detect::max_digits_for(is_amex));
    println!(
        "CVV length: {}",
        cc_fields::status::cvv_length_for(is_amex)
    );
    ExitCode::SUCCESS
}

fn cmd_luhn(number: &str) -> ExitCode {
    let digits = cc_fields::digits::extract_digits(number);
    let passes = luhn::validate(&digits);

    println!("Checksum: {}", luhn::checksum(&digits));
    println!("Passes: {}", if passes { "yes" } else { "no" });
    if !passes && !digits.is_empty() {
        println!("Check digit to append: {}", luhn::check_digit(&digits));
    }

    if passes {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_mask(number: &str) -> ExitCode {
    println!("{}", mask_card_number(number));
    ExitCode::SUCCESS
}

fn cmd_check(
    card: &str,
    expiry: &str,
    cvv: &str,
    today: Option<YearMonth>,
    window_years: u32,
    output: OutputFormat,
) -> ExitCode {
    let mut options = EngineOptions::new()
        .card_number(card)
        .expiry(expiry)
        .cvv(cvv)
        .expiry_window_years(window_years);
    if let Some(today) = today {
        options = options.clock(FixedClock(today));
    }

    let mut fields = options.build();
    fields.initialize();
    let status = fields.status();

    match output {
        OutputFormat::Text => {
            let card_state = fields.card_state();
            let expiry_state = fields.expiry_state();
            let cvv_state = fields.cvv_state();

            let brand = if card_state.brand().is_empty() {
                "-".to_owned()
            } else {
                card_state.brand().to_string()
            };
            println!(
                "Card:   {} ({}, {})",
                status.card(),
                brand,
                mask_card_number(fields.text(Field::Card))
            );
            match (expiry_state.month(), expiry_state.year()) {
                (Some(month), Some(year)) => {
                    println!("Expiry: {} ({:02}/{})", status.expiry(), month, year)
                }
                _ => println!("Expiry: {}", status.expiry()),
            }
            println!(
                "CVV:    {} ({}, {} digits expected)",
                status.cvv(),
                mask_secret(fields.text(Field::Cvv)),
                cvv_state.expected_length()
            );
            println!("All valid: {}", if status.all_valid() { "yes" } else { "no" });
        }
        OutputFormat::Json => {
            let report = CheckReport {
                status,
                masked_card: mask_card_number(fields.text(Field::Card)),
                card: fields.card_state(),
                expiry: fields.expiry_state(),
                cvv: fields.cvv_state(),
            };
            if let Err(code) = print_json(&report) {
                return code;
            }
        }
    }

    if status.all_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ExitCode> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    })?;
    println!("{}", json);
    Ok(())
}
