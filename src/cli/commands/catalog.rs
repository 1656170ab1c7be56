use anyhow::anyhow;
use clap::Subcommand;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::utils::{output_notification, output_success};
use crate::cli::{Console, OutputFormat};
use crate::resources::catalog::{brand_added, image_uploaded, NewBrand};
use crate::session::Route;

#[derive(Subcommand)]
pub enum BrandCommands {
    #[command(about = "List brands with their ids")]
    List,

    #[command(about = "Add a brand")]
    Create {
        #[arg(long, help = "Brand name, e.g. Skoda")]
        name: String,
        #[arg(long, help = "Short name, e.g. SK")]
        short_name: String,
    },
}

#[derive(Subcommand)]
pub enum FuelTypeCommands {
    #[command(about = "List fuel types with their ids")]
    List,
}

#[derive(Subcommand)]
pub enum ImageCommands {
    #[command(about = "List uploaded car images")]
    List,

    #[command(about = "Upload a JPEG or PNG and print its id")]
    Upload {
        #[arg(help = "Image file")]
        file: PathBuf,
    },
}

fn require_session(console: &mut Console, route: Route) -> anyhow::Result<()> {
    console
        .enter(route)
        .map(|_| ())
        .map_err(|_| anyhow!("Not signed in. Run 'rental-admin auth login <username>' first."))
}

pub async fn handle_brands(cmd: BrandCommands, console: &mut Console, output_format: &OutputFormat) -> anyhow::Result<()> {
    require_session(console, Route::Models)?;

    match cmd {
        BrandCommands::List => {
            let brands = console.client.list_brands().await?;
            match output_format {
                OutputFormat::Json => output_success(
                    output_format,
                    &format!("{} brands", brands.len()),
                    Some(json!({ "brands": brands })),
                ),
                OutputFormat::Text => {
                    println!("{:>6}  {:<8}  Name", "ID", "Short");
                    for brand in &brands {
                        println!("{:>6}  {:<8}  {}", brand.id, brand.short_name, brand.name);
                    }
                    Ok(())
                }
            }
        }
        BrandCommands::Create { name, short_name } => {
            let brand = NewBrand { name, short_name };
            let result = console.client.create_brand(&brand).await;
            output_notification(output_format, &brand_added(&brand, &result))
        }
    }
}

pub async fn handle_fuel_types(
    cmd: FuelTypeCommands,
    console: &mut Console,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    require_session(console, Route::Models)?;

    match cmd {
        FuelTypeCommands::List => {
            let fuel_types = console.client.list_fuel_types().await?;
            match output_format {
                OutputFormat::Json => output_success(
                    output_format,
                    &format!("{} fuel types", fuel_types.len()),
                    Some(json!({ "fuel_types": fuel_types })),
                ),
                OutputFormat::Text => {
                    for fuel in &fuel_types {
                        println!("{:>6}  {}", fuel.id, fuel.name);
                    }
                    Ok(())
                }
            }
        }
    }
}

pub async fn handle_images(cmd: ImageCommands, console: &mut Console, output_format: &OutputFormat) -> anyhow::Result<()> {
    require_session(console, Route::Cars)?;

    match cmd {
        ImageCommands::List => {
            let images = console.client.list_images().await?;
            match output_format {
                OutputFormat::Json => output_success(
                    output_format,
                    &format!("{} images", images.len()),
                    Some(json!({ "images": images })),
                ),
                OutputFormat::Text => {
                    for image in &images {
                        println!("{}  {}", image.id, image.url);
                    }
                    Ok(())
                }
            }
        }
        ImageCommands::Upload { file } => {
            let result = console.client.upload_image(&file).await;
            let notification = image_uploaded(&file.display().to_string(), &result);
            match (&result, output_format) {
                (Ok(image), OutputFormat::Json) => output_success(
                    output_format,
                    &notification.description,
                    Some(json!({ "image": image, "notification": notification })),
                ),
                _ => output_notification(output_format, &notification),
            }
        }
    }
}
