use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use jejak_core::PersonalData;

use crate::commands::common::open_database;
use crate::error::CliError;

pub struct RegisterArgs {
    pub name: String,
    pub whatsapp: String,
    pub email: String,
    pub address: String,
    pub mountain: String,
    pub category: String,
    pub package: String,
    pub start_date: Option<String>,
    pub climber_code: Option<String>,
    pub identity: Option<std::path::PathBuf>,
}

pub async fn run_register(args: RegisterArgs, db_path: &Path) -> Result<(), CliError> {
    let data = build_personal_data(&args)?;

    let db = open_database(db_path).await?;
    let registration = db.create_registration(&data).await?;
    let settings = db.load_settings().await?;

    println!("Booking created");
    println!("  Ticket id : {}", registration.id);
    println!("  Name      : {}", registration.data.full_name);
    println!("  Mountain  : {}", registration.data.mountain);
    println!(
        "  Trip      : {} / {} starting {}",
        registration.data.package_category,
        registration.data.trip_package,
        registration.data.start_date
    );
    println!("  Status    : {}", registration.status);
    println!();
    println!(
        "Check your status later with `jejak ticket {}` or your WhatsApp number.",
        registration.id
    );
    println!(
        "Questions? Contact {} / {}",
        settings.admin_phone, settings.admin_email
    );

    Ok(())
}

fn build_personal_data(args: &RegisterArgs) -> Result<PersonalData, CliError> {
    let full_name = required_field(&args.name, "Participant name")?;
    let whatsapp = required_field(&args.whatsapp, "WhatsApp number")?;
    let mountain = required_field(&args.mountain, "Destination mountain")?;

    let start_date = args
        .start_date
        .clone()
        .filter(|date| !date.trim().is_empty())
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());

    let identity_image = match &args.identity {
        Some(path) => Some(encode_identity_image(path)?),
        None => None,
    };

    Ok(PersonalData {
        full_name,
        whatsapp,
        email: args.email.trim().to_string(),
        address: args.address.trim().to_string(),
        mountain,
        package_category: args.category.trim().to_string(),
        trip_package: args.package.trim().to_string(),
        start_date,
        climber_code: args
            .climber_code
            .clone()
            .filter(|code| !code.trim().is_empty()),
        identity_image,
    })
}

fn required_field(value: &str, label: &'static str) -> Result<String, CliError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyField(label))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Embed an identity image file as a data URL, matching the payload the
/// registration form uploads.
fn encode_identity_image(path: &Path) -> Result<String, CliError> {
    let mime = match path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => {
            return Err(CliError::IdentityImage {
                path: path.display().to_string(),
                message: "unsupported format (use JPG or PNG)".to_string(),
            })
        }
    };

    let bytes = std::fs::read(path).map_err(|error| CliError::IdentityImage {
        path: path.display().to_string(),
        message: error.to_string(),
    })?;

    Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
}
