use crate::model::IconTag;

/// Exact description phrases the provider is known to emit, matched
/// case-insensitively before falling back to the coarse condition group.
/// The phrase table is far more specific than the `main` enum, so it
/// wins whenever it matches.
const PHRASE_TABLE: &[(&str, IconTag)] = &[
    // clear
    ("clear sky", IconTag::Sunny),
    // clouds
    ("few clouds", IconTag::PartlySunny),
    ("scattered clouds", IconTag::Cloudy),
    ("broken clouds", IconTag::Cloudy),
    ("overcast clouds", IconTag::Cloudy),
    // rain
    ("light rain", IconTag::Rainy),
    ("moderate rain", IconTag::Rainy),
    ("heavy intensity rain", IconTag::Rainy),
    ("very heavy rain", IconTag::Rainy),
    ("extreme rain", IconTag::Rainy),
    ("freezing rain", IconTag::Rainy),
    ("light intensity shower rain", IconTag::Rainy),
    ("shower rain", IconTag::Rainy),
    ("heavy intensity shower rain", IconTag::Rainy),
    ("ragged shower rain", IconTag::Rainy),
    // drizzle
    ("light intensity drizzle", IconTag::Rainy),
    ("drizzle", IconTag::Rainy),
    ("heavy intensity drizzle", IconTag::Rainy),
    ("light intensity drizzle rain", IconTag::Rainy),
    ("drizzle rain", IconTag::Rainy),
    ("heavy intensity drizzle rain", IconTag::Rainy),
    ("shower rain and drizzle", IconTag::Rainy),
    ("heavy shower rain and drizzle", IconTag::Rainy),
    ("shower drizzle", IconTag::Rainy),
    // thunderstorm
    ("thunderstorm with light rain", IconTag::Rainy),
    ("thunderstorm with rain", IconTag::Rainy),
    ("thunderstorm with heavy rain", IconTag::Rainy),
    ("light thunderstorm", IconTag::Rainy),
    ("thunderstorm", IconTag::Rainy),
    ("heavy thunderstorm", IconTag::Rainy),
    ("ragged thunderstorm", IconTag::Rainy),
    ("thunderstorm with light drizzle", IconTag::Rainy),
    ("thunderstorm with drizzle", IconTag::Rainy),
    ("thunderstorm with heavy drizzle", IconTag::Rainy),
    // snow and sleet
    ("light snow", IconTag::Snowy),
    ("snow", IconTag::Snowy),
    ("heavy snow", IconTag::Snowy),
    ("sleet", IconTag::Snowy),
    ("light shower sleet", IconTag::Snowy),
    ("shower sleet", IconTag::Snowy),
    ("light rain and snow", IconTag::Snowy),
    ("rain and snow", IconTag::Snowy),
    ("light shower snow", IconTag::Snowy),
    ("shower snow", IconTag::Snowy),
    ("heavy shower snow", IconTag::Snowy),
    // atmosphere
    ("mist", IconTag::Foggy),
    ("smoke", IconTag::Foggy),
    ("haze", IconTag::Foggy),
    ("sand/dust whirls", IconTag::Foggy),
    ("fog", IconTag::Foggy),
    ("sand", IconTag::Foggy),
    ("dust", IconTag::Foggy),
    ("volcanic ash", IconTag::Foggy),
    ("squalls", IconTag::Foggy),
    ("tornado", IconTag::Foggy),
];

/// Maps a provider condition onto a display icon.
///
/// `icon_code` is the provider's icon id, e.g. `"10d"`: two digits for
/// the condition group and a `d`/`n` suffix for day/night. It only
/// matters for the clear and clouds groups, where day/night and cloud
/// density change the picture.
pub fn classify(main: &str, description: &str, icon_code: &str) -> IconTag {
    let description = description.to_lowercase();
    if let Some((_, tag)) = PHRASE_TABLE
        .iter()
        .find(|(phrase, _)| *phrase == description.trim())
    {
        return *tag;
    }

    let code = icon_code.get(..2).unwrap_or_default();
    let is_day = icon_code.contains('d');

    match main.to_lowercase().as_str() {
        "clear" => {
            if is_day {
                IconTag::Sunny
            } else {
                IconTag::Clear
            }
        }
        "clouds" => {
            if code == "02" {
                IconTag::PartlySunny
            } else {
                IconTag::Cloudy
            }
        }
        "rain" | "drizzle" | "thunderstorm" => IconTag::Rainy,
        "snow" => IconTag::Snowy,
        "mist" | "smoke" | "haze" | "dust" | "fog" | "sand" | "ash" | "squall" | "tornado" => {
            IconTag::Foggy
        }
        _ => IconTag::Cloudy,
    }
}
