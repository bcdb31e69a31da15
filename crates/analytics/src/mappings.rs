//! Static commodity annotations used in the summary table.

use core_types::Sector;

/// The sector a commodity is reported under, if it is a known series.
pub fn sector_for(commodity: &str) -> Option<Sector> {
    let sector = match commodity {
        "Canola" | "Cocoa" | "Coffee" | "Corn" | "Cotton" | "Lumber" | "Oats" | "Orange juice"
        | "Rough rice" | "Soybean meal" | "Soybeans" | "Wheat" => Sector::Agriculture,
        "Crude Oil" | "Gasoline" | "Heating Oil" | "Natural gas" | "Unleaded gas" => Sector::Energy,
        "Feeder cattle" | "Lean hogs" | "Live cattle" => Sector::Livestock,
        "Aluminium" | "Copper" | "Gold" | "Palladium" | "Platinum" | "Silver" => Sector::Metals,
        _ => return None,
    };
    Some(sector)
}

/// The exchange ticker root of a commodity, if it is a known series.
pub fn symbol_for(commodity: &str) -> Option<&'static str> {
    let symbol = match commodity {
        "Canola" => "WC",
        "Cocoa" => "CC",
        "Coffee" => "KC",
        "Corn" => "C-",
        "Cotton" => "CT",
        "Lumber" => "LB",
        "Oats" => "O-",
        "Orange juice" => "JO",
        "Rough rice" => "RR",
        "Soybean meal" => "SM",
        "Soybeans" => "S-",
        "Wheat" => "W-",
        "Crude Oil" => "CL",
        "Gasoline" => "RB",
        "Heating Oil" => "HO",
        "Natural gas" => "NG",
        "Unleaded gas" => "HU",
        "Feeder cattle" => "FC",
        "Lean hogs" => "LH",
        "Live cattle" => "LC",
        "Aluminium" => "AL",
        "Copper" => "HG",
        "Gold" => "GC",
        "Palladium" => "PA",
        "Platinum" => "PL",
        "Silver" => "SI",
        _ => return None,
    };
    Some(symbol)
}
