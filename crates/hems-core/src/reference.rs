//! Built-in reference data: ADAC Luftrettung helicopter bases and airports
//! with instrument approaches in and around Germany.

use crate::error::{ReachError, Result};
use crate::models::{Airport, HelicopterBase};

/// (name, lat, lon, elevation_ft)
const HELICOPTER_BASES: &[(&str, f64, f64, f64)] = &[
    ("Christoph 1 Munich", 48.3539, 11.7861, 1487.0),
    ("Christoph 5 Ludwigshafen", 49.4778, 8.4336, 302.0),
    ("Christoph 6 Bremen", 53.0475, 8.7867, 14.0),
    ("Christoph 8 Lünen", 51.6201, 7.5299, 223.0),
    ("Christoph 10 Wittlich", 49.9917, 6.8833, 1135.0),
    ("Christoph 15 Straubing", 48.9006, 12.5731, 1073.0),
    ("Christoph 16 Saarbrücken", 49.2075, 7.1094, 1050.0),
    ("Christoph 18 Ochsenfurt", 49.6625, 10.0522, 600.0),
    ("Christoph 19 Uelzen", 52.9622, 10.5478, 93.0),
    ("Christoph 20 Bayreuth", 49.9778, 11.6203, 1608.0),
    ("Christoph 22 Ulm", 48.4019, 9.9875, 1545.0),
    ("Christoph 23 Koblenz", 50.3625, 7.5878, 607.0),
    ("Christoph 25 Siegen", 50.8811, 8.0164, 1300.0),
    ("Christoph 26 Sande", 53.5208, 8.0206, 7.0),
    ("Christoph 28 Fulda", 50.5625, 9.6778, 1310.0),
    ("Christoph 30 Wolfenbüttel", 52.1592, 10.5325, 240.0),
    ("Christoph 31 Berlin", 52.555, 13.2875, 112.0),
    ("Christoph 32 Ingolstadt", 48.7651, 11.4488, 1211.0),
    ("Christoph 33 Senftenberg", 51.5033, 14.0161, 328.0),
    ("Christoph 39 Perleberg", 53.0842, 11.8561, 83.0),
    ("Christoph 40 Augsburg", 48.425, 10.925, 1512.0),
    ("Christoph 46 Dinkelsbühl", 49.0753, 10.3431, 1440.0),
    ("Christoph 48 Neustrelitz", 53.3642, 13.0744, 214.0),
    ("Christoph 50 Hamburg", 53.5489, 9.9894, 20.0),
    ("Christoph 61 Leipzig", 51.4158, 12.2883, 420.0),
    ("Christoph 65 Dinkelsbühl", 49.0753, 10.3431, 1440.0),
    ("Christoph 66 Imsweiler", 49.558, 7.865, 850.0),
    ("Christoph 67 Hungriger Wolf", 53.991, 9.558, 89.0),
    ("Christoph 70 Jena", 50.899, 11.5831, 400.0),
    ("Christoph 74 Senftenberg", 51.5177, 14.0261, 328.0),
    ("Christoph 75 Rheinland", 50.7686, 7.1829, 180.0),
    ("Christoph 77 Mainz", 50.0, 8.2711, 479.0),
    ("Christoph Europa 1 Würselen", 50.8283, 6.1151, 400.0),
    ("Christoph Europa 2 Rheine", 52.2711, 7.3829, 135.0),
];

/// (name, icao, lat, lon, elevation_ft)
const AIRPORTS: &[(&str, &str, f64, f64, f64)] = &[
    ("Kleine Brogel Air Base", "EBBL", 51.1681, 5.4708, 207.0),
    ("Bautzen Airport", "EDAB", 51.1931, 14.5197, 495.0),
    ("Leipzig-Altenburg Airport", "EDAC", 50.9818, 12.5063, 640.0),
    ("Heringsdorf Airport", "EDAH", 53.8787, 14.1523, 93.0),
    ("Strausberg Airport", "EDAY", 52.5794, 13.915, 262.0),
    ("Schönhagen Airport", "EDAZ", 52.2033, 13.1583, 158.0),
    ("Magdeburg-Cochstedt Airport", "EDBC", 51.8564, 11.4203, 598.0),
    ("Barth Airport", "EDBH", 54.3375, 12.7214, 7.0),
    ("Magdeburg Airport", "EDBM", 52.0733, 11.6267, 271.0),
    ("Neubrandenburg Airport", "EDBN", 53.6022, 13.3067, 232.0),
    ("Berlin Brandenburg Airport", "EDDB", 52.3667, 13.5033, 157.0),
    ("Dresden Airport", "EDDC", 51.1328, 13.7672, 755.0),
    ("Erfurt-Weimar Airport", "EDDE", 50.98, 10.9581, 1036.0),
    ("Frankfurt Airport", "EDDF", 50.0379, 8.5622, 364.0),
    ("Münster Osnabrück International Airport", "EDDG", 52.1346, 7.6848, 157.0),
    ("Hamburg Airport", "EDDH", 53.6303, 9.9883, 53.0),
    ("Köln/Bonn Airport", "EDDK", 50.8659, 7.1427, 302.0),
    ("Düsseldorf Airport", "EDDL", 51.2894, 6.7667, 147.0),
    ("Munich Airport", "EDDM", 48.3538, 11.7861, 1483.0),
    ("Nuremberg Airport", "EDDN", 49.4986, 11.0783, 1046.0),
    ("Leipzig/Halle Airport", "EDDP", 51.4325, 12.2417, 470.0),
    ("Saarbrücken Airport", "EDDR", 49.215, 7.1094, 1058.0),
    ("Hannover Airport", "EDDV", 52.4611, 9.685, 183.0),
    ("Bremen Airport", "EDDW", 53.0475, 8.7867, 14.0),
    ("Frankfurt-Hahn Airport", "EDFH", 49.9483, 7.2639, 1641.0),
    ("Mannheim City Airport", "EDFM", 49.4731, 8.5142, 308.0),
    ("Allendorf/Eder Airport", "EDFQ", 51.034, 8.6808, 1010.0),
    ("Siegerland Airport", "EDGS", 50.7077, 8.0825, 1969.0),
    ("Hamburg-Finkenwerder Airport", "EDHI", 53.5358, 9.8356, 22.0),
    ("Kiel-Holtenau Airport", "EDHK", 54.3794, 10.1453, 101.0),
    ("Lübeck Airport", "EDHL", 53.8054, 10.7192, 53.0),
    ("Memmingen Airport", "EDJA", 47.9888, 10.2394, 2077.0),
    ("Aachen-Merzbrück Airport", "EDKA", 50.8233, 6.1867, 623.0),
    ("Paderborn Lippstadt Airport", "EDLP", 51.6141, 8.6163, 699.0),
    ("Dortmund Airport", "EDLW", 51.5183, 7.6122, 425.0),
    ("Augsburg Airport", "EDMA", 48.425, 10.9317, 1512.0),
    ("Eggenfelden Airport", "EDME", 48.3967, 12.7239, 1410.0),
    ("Friedrichshafen Airport", "EDNY", 47.6713, 9.5115, 1367.0),
    ("Schwerin-Parchim Airport", "EDOP", 53.4269, 11.7835, 167.0),
    ("Bamberg-Breitenau Airport", "EDQA", 49.9208, 10.9142, 758.0),
    ("Coburg-Brandensteinsebene Airport", "EDQC", 50.2622, 10.9953, 1050.0),
    ("Bayreuth Airport", "EDQD", 49.9858, 11.64, 1611.0),
    ("Giebelstadt Airport", "EDQG", 49.6631, 9.9661, 980.0),
    ("Hof-Plauen Airport", "EDQM", 50.2886, 11.8569, 1949.0),
    ("Haßfurt-Schweinfurt Airport", "EDQT", 50.0181, 10.5294, 726.0),
    ("Zweibrücken Airport", "EDRZ", 49.2094, 7.4008, 1132.0),
    ("Karlsruhe/Baden-Baden Airport", "EDSB", 48.7793, 8.0805, 408.0),
    ("Donaueschingen-Villingen Airport", "EDTD", 47.9736, 8.5225, 2247.0),
    ("Lahr Airport", "EDTL", 48.3697, 7.8272, 511.0),
    ("Schwäbisch Hall Airport", "EDTY", 49.1181, 9.7831, 1316.0),
    ("Braunschweig-Wolfsburg Airport", "EDVE", 52.3192, 10.5561, 295.0),
    ("Kassel Airport", "EDVK", 51.4083, 9.3775, 827.0),
    ("Emden Airport", "EDWE", 53.3911, 7.2275, 3.0),
    ("Wilhelmshaven-Mariensiel Airport", "EDWI", 53.5333, 8.0522, 16.0),
    ("Sylt Airport", "EDXW", 54.9132, 8.3405, 51.0),
    ("Volkel Air Base", "EHVK", 51.6561, 5.7075, 69.0),
    ("Spangdahlem Air Base", "ETAD", 49.9727, 6.6925, 1200.0),
    ("Ramstein Air Base", "ETAR", 49.4369, 7.6003, 778.0),
    ("Bückeburg Air Base", "ETHB", 52.2789, 9.0839, 234.0),
    ("Cuxhaven-Nordholz Airport", "ETMN", 53.7677, 8.6585, 74.0),
    ("Geilenkirchen Air Base", "ETNG", 50.9608, 6.0424, 296.0),
    ("Jever Air Base", "ETNJ", 53.5339, 7.8883, 27.0),
    ("Rostock–Laage Airport", "ETNL", 53.9181, 12.2789, 138.0),
    ("Nörvenich Air Base", "ETNN", 50.8311, 6.6583, 400.0),
    ("Jagel Air Base", "ETNS", 54.4592, 9.5167, 26.0),
    ("Wunstorf Air Base", "ETNW", 52.4575, 9.4278, 189.0),
    ("Wiesbaden Army Airfield", "ETOU", 50.0498, 8.3254, 461.0),
    ("Büchel Air Base", "ETSB", 50.1747, 7.0633, 1555.0),
    ("Holzdorf Air Base", "ETSH", 51.7678, 13.1672, 265.0),
    ("Ingolstadt-Manching Airport", "ETSI", 48.7157, 11.5327, 1204.0),
    ("Neuburg Air Base", "ETSN", 48.7111, 11.2167, 1265.0),
];

pub fn helicopter_bases() -> Vec<HelicopterBase> {
    HELICOPTER_BASES
        .iter()
        .map(|&(name, lat, lon, elevation_ft)| HelicopterBase {
            name: name.to_string(),
            lat,
            lon,
            elevation_ft,
        })
        .collect()
}

pub fn airports() -> Vec<Airport> {
    AIRPORTS
        .iter()
        .map(|&(name, icao, lat, lon, elevation_ft)| Airport::new(name, icao, lat, lon, elevation_ft))
        .collect()
}

/// Look up a base by full name, by its call sign prefix ("Christoph 77") or
/// by its town ("Mainz"). Case-insensitive; the first table entry wins.
pub fn find_base(query: &str) -> Result<HelicopterBase> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(ReachError::UnknownLocation(query.to_string()));
    }

    HELICOPTER_BASES
        .iter()
        .find(|(name, ..)| base_matches(&name.to_lowercase(), &needle))
        .map(|&(name, lat, lon, elevation_ft)| HelicopterBase {
            name: name.to_string(),
            lat,
            lon,
            elevation_ft,
        })
        .ok_or_else(|| ReachError::UnknownLocation(query.to_string()))
}

fn base_matches(name: &str, needle: &str) -> bool {
    if name == needle {
        return true;
    }
    let prefix = name
        .strip_prefix(needle)
        .is_some_and(|rest| rest.starts_with(' '));
    let town = name
        .strip_suffix(needle)
        .is_some_and(|rest| rest.ends_with(' '));
    prefix || town
}

pub fn find_airport(icao: &str) -> Result<Airport> {
    let icao = icao.trim().to_uppercase();
    AIRPORTS
        .iter()
        .find(|(_, code, ..)| *code == icao)
        .map(|&(name, code, lat, lon, elevation_ft)| Airport::new(name, code, lat, lon, elevation_ft))
        .ok_or(ReachError::UnknownLocation(icao))
}
