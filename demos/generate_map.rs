//! Example: Generate a polygon island map
//!
//! Usage: cargo run --example generate_map -- [shape] [variant_seed]

use voronoi_island::*;

fn main() {
    println!("Voronoi Island Generation Example");
    println!("=================================\n");

    let mut args = std::env::args().skip(1);
    let shape = args.next().unwrap_or_else(|| "radial".to_string());
    let variant_seed: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let config = MapConfigBuilder::new()
        .island_shape_name(&shape)
        .expect("Unknown island shape")
        .island_seed(7)
        .variant_seed(variant_seed)
        .map_size(MapSize::Small)
        .build()
        .expect("Invalid configuration");

    println!("Configuration:");
    println!("  Island Shape: {}", config.island_shape);
    println!("  Island Seed: {}", config.island_seed);
    println!("  Variant Seed: {}", config.variant_seed);
    println!("  Map Size: {} ({} points)", config.map_size.name(), config.point_count());
    println!("  Lloyd Iterations: {}", config.lloyd_iterations);
    println!();

    println!("Generating map...");
    let map = VoronoiMap::generate(config).expect("Failed to generate map");
    println!(
        "Generated {} regions, {} corners, {} edges\n",
        map.region_count(),
        map.corner_count(),
        map.edge_count()
    );

    let land = map.regions().iter().filter(|r| !r.water).count();
    let lakes = map.regions().iter().filter(|r| r.is_lake()).count();
    let river_edges = map.edges().iter().filter(|e| e.river > 0).count();
    let avg_neighbors =
        map.regions().iter().map(|r| r.neighbors.len()).sum::<usize>() as f64 / map.region_count() as f64;

    println!("Statistics:");
    println!("  Land regions: {} ({:.1}%)", land, 100.0 * land as f64 / map.region_count() as f64);
    println!("  Lake regions: {}", lakes);
    println!("  River edges: {}", river_edges);
    println!("  Average neighbors per region: {:.2}", avg_neighbors);
    println!();

    println!("Biomes:");
    for (biome, count) in map.biome_counts() {
        println!("  {:<28} {}", biome.name(), count);
    }

    #[cfg(feature = "spatial-index")]
    {
        let centre = map.bounds().center();
        let id = map.find_region_at(centre);
        if let Some(region) = map.get_region(id) {
            println!(
                "\nCentre region {}: elevation={:.3}, moisture={:.3}, biome={}",
                id, region.elevation, region.moisture, region.biome
            );
        }
    }

    println!("\nGeneration complete!");
}
