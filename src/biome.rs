//! Regolith and terrain-feature assignment.
//!
//! Each tile samples the temperature and rainfall fields at its center
//! and picks a regolith category from a threshold cascade over
//! (relief, precipitation, temperature). Two feature rules follow:
//! sandy river tiles become floodplains, and wet grassland becomes
//! woods where a low-frequency mask field clears the density cutoff.

use log::debug;

use crate::config::GenerationConfig;
use crate::fields::WorldFields;
use crate::world::{Feature, Regolith, Relief, World};

/// Regolith lookup over the classified bands.
/// Absolute temperature extremes override the table: deep cold is
/// always snow, scorching heat always sand.
fn pick_regolith(
    relief: Relief,
    temperature: f64,
    precipitation: f64,
    config: &GenerationConfig,
) -> Regolith {
    if relief == Relief::Seabed {
        return Regolith::Marine;
    }
    if temperature < config.snow_temperature {
        return Regolith::Snow;
    }
    if temperature > config.desert_temperature {
        return Regolith::Sand;
    }

    match relief {
        Relief::Seabed => Regolith::Marine,
        Relief::Highland => Regolith::Rock,
        Relief::Upland => {
            if precipitation < config.dry_precipitation {
                Regolith::Rock
            } else if precipitation > config.woods_precipitation {
                Regolith::Grass
            } else {
                Regolith::Dirt
            }
        }
        Relief::Lowland => {
            if precipitation < config.dry_precipitation {
                Regolith::Sand
            } else {
                Regolith::Grass
            }
        }
    }
}

/// Sample climate per tile, assign regolith, then derive floodplain and
/// woods features.
pub fn assign_properties(world: &mut World, fields: &WorldFields, config: &GenerationConfig) {
    for i in 0..world.tiles.len() {
        let (u, v) = world.bounds.normalize(&world.tiles[i].center);
        let temperature = fields.temperature.sample(u, v);
        let precipitation = fields.rainfall.sample(u, v);

        let tile = &mut world.tiles[i];
        tile.temperature = temperature;
        tile.precipitation = precipitation;
        tile.regolith = pick_regolith(tile.relief, temperature, precipitation, config);
    }

    for i in 0..world.tiles.len() {
        let (u, v) = world.bounds.normalize(&world.tiles[i].center);
        let tile = &world.tiles[i];
        let feature = if tile.river && tile.regolith == Regolith::Sand {
            Some(Feature::Floodplain)
        } else if tile.regolith == Regolith::Grass
            && tile.precipitation > config.woods_precipitation
            && fields.woods.sample(u, v) > config.woods_density
        {
            Some(Feature::Woods)
        } else {
            None
        };
        if let Some(feature) = feature {
            world.tiles[i].feature = feature;
        }
    }

    debug!(
        "biomes: {} grass, {} woods, {} floodplain tiles",
        world
            .tiles
            .iter()
            .filter(|t| t.regolith == Regolith::Grass)
            .count(),
        world
            .tiles
            .iter()
            .filter(|t| t.feature == Feature::Woods)
            .count(),
        world
            .tiles
            .iter()
            .filter(|t| t.feature == Feature::Floodplain)
            .count()
    );
}
