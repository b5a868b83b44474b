use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;

use crate::catalog::{FoodItem, Micronutrients};

// Expected column headers of the semicolon-delimited catalog export.
const ID_COL: &str = "id";
const NAME_COL: &str = "name";
const KCAL_COL: &str = "kcal_100g";
const PROTEIN_COL: &str = "protein_g_100g";
const FAT_COL: &str = "fat_g_100g";
const CARB_COL: &str = "carb_g_100g";
const FIBER_COL: &str = "fiber_g_100g";
const CALCIUM_COL: &str = "calcium_mg_100g";
const IRON_COL: &str = "iron_mg_100g";
const ZINC_COL: &str = "zinc_mg_100g";
const MAGNESIUM_COL: &str = "magnesium_mg_100g";
const POTASSIUM_COL: &str = "potassium_mg_100g";
const SODIUM_COL: &str = "sodium_mg_100g";
const VIT_C_COL: &str = "vitamin_c_mg_100g";
const VIT_A_COL: &str = "vitamin_a_ug_100g";
const FOLATE_COL: &str = "folate_ug_100g";
const VIT_B12_COL: &str = "vitamin_b12_ug_100g";
const WASTE_COL: &str = "waste_factor";

fn parse_f32_or(s: Option<&str>, default: f32) -> f32 {
    s.and_then(|v| v.trim().parse::<f32>().ok()).unwrap_or(default)
}

/// Loads the food catalog from a semicolon-delimited CSV export.
///
/// Missing or unparsable nutrient cells default to 0.0 and a missing
/// waste factor defaults to 1.0, so sparse rows still produce usable
/// entries. Rows with an empty name are skipped.
pub fn load_food_catalog(csv_path: &Path) -> Result<Vec<FoodItem>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Catalog CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open catalog CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .from_reader(file);

    let headers = rdr.headers()?.clone();
    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
    };

    let id_idx = col(ID_COL)?;
    let name_idx = col(NAME_COL)?;
    let kcal_idx = col(KCAL_COL)?;
    let protein_idx = col(PROTEIN_COL)?;
    let fat_idx = col(FAT_COL)?;
    let carb_idx = col(CARB_COL)?;
    let fiber_idx = col(FIBER_COL)?;
    let calcium_idx = col(CALCIUM_COL)?;
    let iron_idx = col(IRON_COL)?;
    let zinc_idx = col(ZINC_COL)?;
    let magnesium_idx = col(MAGNESIUM_COL)?;
    let potassium_idx = col(POTASSIUM_COL)?;
    let sodium_idx = col(SODIUM_COL)?;
    let vit_c_idx = col(VIT_C_COL)?;
    let vit_a_idx = col(VIT_A_COL)?;
    let folate_idx = col(FOLATE_COL)?;
    let vit_b12_idx = col(VIT_B12_COL)?;
    let waste_idx = col(WASTE_COL)?;

    let mut catalog = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let name = record
            .get(name_idx)
            .unwrap_or_default()
            .trim()
            .to_string();
        if name.is_empty() {
            continue;
        }

        let item = FoodItem {
            id: record
                .get(id_idx)
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(row_index as u32),
            name,
            energy_kcal: parse_f32_or(record.get(kcal_idx), 0.0),
            protein_g: parse_f32_or(record.get(protein_idx), 0.0),
            fat_g: parse_f32_or(record.get(fat_idx), 0.0),
            carbohydrate_g: parse_f32_or(record.get(carb_idx), 0.0),
            fiber_g: parse_f32_or(record.get(fiber_idx), 0.0),
            micros: Micronutrients {
                calcium_mg: parse_f32_or(record.get(calcium_idx), 0.0),
                iron_mg: parse_f32_or(record.get(iron_idx), 0.0),
                zinc_mg: parse_f32_or(record.get(zinc_idx), 0.0),
                magnesium_mg: parse_f32_or(record.get(magnesium_idx), 0.0),
                potassium_mg: parse_f32_or(record.get(potassium_idx), 0.0),
                sodium_mg: parse_f32_or(record.get(sodium_idx), 0.0),
                vitamin_c_mg: parse_f32_or(record.get(vit_c_idx), 0.0),
                vitamin_a_ug: parse_f32_or(record.get(vit_a_idx), 0.0),
                folate_ug: parse_f32_or(record.get(folate_idx), 0.0),
                vitamin_b12_ug: parse_f32_or(record.get(vit_b12_idx), 0.0),
            },
            waste_factor: parse_f32_or(record.get(waste_idx), 1.0).max(1.0),
        };
        catalog.push(item);
    }

    if catalog.is_empty() {
        return Err(anyhow::anyhow!("No valid catalog rows loaded from {:?}", csv_path));
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "id;name;kcal_100g;protein_g_100g;fat_g_100g;carb_g_100g;fiber_g_100g;calcium_mg_100g;iron_mg_100g;zinc_mg_100g;magnesium_mg_100g;potassium_mg_100g;sodium_mg_100g;vitamin_c_mg_100g;vitamin_a_ug_100g;folate_ug_100g;vitamin_b12_ug_100g;waste_factor";

    fn create_test_csv_file() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", HEADER)?;
        writeln!(file, "1;Apple, raw;52;0.3;0.2;13.8;2.4;6;0.1;0.04;5;107;1;4.6;3;3;0;1.08")?;
        writeln!(file, "2;Banana;;1.1;0.3;22.8;2.6;5;0.3;0.15;27;358;1;8.7;3;20;0;1.54")?; // missing kcal
        writeln!(file, "3;;10;10;10;10;10;1;1;1;1;1;1;1;1;1;1;1.0")?; // empty name
        writeln!(file, "4;Chicken breast, raw;120;22.5;2.6;0;0;5;0.4;0.7;27;330;63;0;6;4;0.2;")?; // missing waste
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_food_catalog_success() -> Result<()> {
        let file = create_test_csv_file()?;
        let catalog = load_food_catalog(file.path())?;

        assert_eq!(catalog.len(), 3); // empty-name row skipped

        let apple = catalog.iter().find(|f| f.name == "Apple, raw").unwrap();
        assert_eq!(apple.energy_kcal, 52.0);
        assert_eq!(apple.micros.potassium_mg, 107.0);
        assert_eq!(apple.waste_factor, 1.08);

        let banana = catalog.iter().find(|f| f.name == "Banana").unwrap();
        assert_eq!(banana.energy_kcal, 0.0); // missing cell defaults to 0

        let chicken = catalog.iter().find(|f| f.name.starts_with("Chicken")).unwrap();
        assert_eq!(chicken.waste_factor, 1.0); // missing waste defaults to 1

        Ok(())
    }

    #[test]
    fn test_load_food_catalog_missing_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "id;name;protein_g_100g")?;
        writeln!(file, "1;Apple;0.3")?;
        file.flush()?;

        let result = load_food_catalog(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Column 'kcal_100g' not found"));
        Ok(())
    }

    #[test]
    fn test_load_food_catalog_empty_file_with_headers() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", HEADER)?;
        file.flush()?;

        let result = load_food_catalog(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No valid catalog rows loaded"));
        Ok(())
    }

    #[test]
    fn test_load_food_catalog_file_not_found() {
        let path = Path::new("this_file_does_not_exist.csv");
        let result = load_food_catalog(path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Catalog CSV file not found"));
    }
}
