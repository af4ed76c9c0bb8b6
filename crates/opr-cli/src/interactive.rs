use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use opr_core::models::{City, CityType, IslandGroup};

/// Interactive city setup, starting from `defaults`
pub fn interactive_city(defaults: &City) -> Result<City> {
    println!("\n🚌 OPR Workspace Setup\n");

    let name: String =
        Input::new().with_prompt("City / municipality").default(defaults.name.clone()).interact_text()?;

    let island_labels: Vec<&str> = IslandGroup::ALL.iter().map(|g| g.as_str()).collect();
    let island_idx = Select::new()
        .with_prompt("Island group")
        .items(&island_labels)
        .default(IslandGroup::ALL.iter().position(|g| *g == defaults.island_group).unwrap_or(0))
        .interact()?;

    let region: String =
        Input::new().with_prompt("Region").default(defaults.region.clone()).interact_text()?;
    let region_code: String =
        Input::new().with_prompt("Region code").default(defaults.region_code.clone()).interact_text()?;
    let province: String =
        Input::new().with_prompt("Province").default(defaults.province.clone()).interact_text()?;
    let province_code: String = Input::new()
        .with_prompt("Province code")
        .default(defaults.province_code.clone())
        .interact_text()?;

    let type_labels: Vec<&str> = CityType::ALL.iter().map(|t| t.label()).collect();
    let type_idx = Select::new()
        .with_prompt("City type")
        .items(&type_labels)
        .default(CityType::ALL.iter().position(|t| *t == defaults.city_type).unwrap_or(0))
        .interact()?;

    let postal_code: String = Input::new()
        .with_prompt("Postal code (4 characters)")
        .default(defaults.postal_code.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.chars().count() <= 4 {
                Ok(())
            } else {
                Err("Postal codes have at most 4 characters")
            }
        })
        .interact_text()?;

    let latitude: f64 =
        Input::new().with_prompt("Latitude").default(defaults.latitude).interact_text()?;
    let longitude: f64 =
        Input::new().with_prompt("Longitude").default(defaults.longitude).interact_text()?;

    let city = City {
        island_group: IslandGroup::ALL[island_idx],
        region,
        region_code,
        province,
        province_code,
        name,
        city_type: CityType::ALL[type_idx],
        postal_code,
        latitude,
        longitude,
    };

    println!("\n📋 Summary\n");
    println!("  City:          {}", city.name);
    println!("  Island group:  {}", city.island_group);
    println!("  Region:        {} ({})", city.region, city.region_code);
    println!("  Province:      {} ({})", city.province, city.province_code);
    println!("  Type:          {}", city.city_type.label());
    println!("  Postal code:   {}", city.postal_code);
    println!("  Location:      {:.6}, {:.6}", city.latitude, city.longitude);
    println!();

    let confirmed = Confirm::new().with_prompt("Create workspace?").default(true).interact()?;
    if !confirmed {
        anyhow::bail!("Workspace setup cancelled");
    }

    Ok(city)
}
