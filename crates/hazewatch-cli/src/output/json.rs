use hazewatch_core::error::HazeError;
use hazewatch_core::model::ReadingsDocument;

pub fn print(document: &ReadingsDocument) -> Result<(), HazeError> {
    let json = serde_json::to_string_pretty(document)?;
    println!("{json}");
    Ok(())
}
