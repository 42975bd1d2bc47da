//! Render formatted text to a PNG file.
//!
//! Expects the width table and glyph sheets under the asset root, laid out as
//! `data/glyph_sizes.bin` and `glyphs/{old,new}/XX.png`.
//!
//! Run with: cargo run -p lorecraft --example render_tooltip -- <asset-root> "&6&lTitle\n&7lore"

use lorecraft::prelude::*;

fn main() {
    lorecraft::core::logging::init();

    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "assets".to_string());
    let text = args
        .next()
        .unwrap_or_else(|| "&b&lDiamond Sword\n&7When in main hand:\n &22 Attack Speed".to_string())
        .replace("\\n", "\n");

    let settings = RenderSettings {
        update_period: 0,
        ..RenderSettings::default()
    };

    let result = pollster::block_on(async {
        let mut generator = Generator::builder()
            .asset_root(&root)
            .settings(settings)
            .text(text)
            .build()
            .await?;
        let outcome = generator.render().await?;
        let name = generator.suggested_file_name();
        generator.save_png(&name)?;
        Ok::<_, GeneratorError>((outcome, name))
    });

    match result {
        Ok((RenderOutcome::Rendered(stats), name)) => {
            println!(
                "Wrote {} ({}x{}, {} segment draw(s))",
                name, stats.size.width, stats.size.height, stats.draws
            );
        }
        Ok((outcome, name)) => println!("Wrote {} ({:?})", name, outcome),
        Err(err) => {
            eprintln!("Failed to render tooltip from '{}': {}", root, err);
            std::process::exit(1);
        }
    }
}
