//! Show a feedback band table.

use crate::BandPreset;

pub fn run(preset: BandPreset) -> anyhow::Result<()> {
    let bands = preset.bands();

    println!("Feedback bands ({} preset):", preset_name(preset));
    for band in bands.bands() {
        println!(
            "  {:<12} {:<16} {}",
            band.range_label(),
            band.label,
            band.rating
        );
        println!("  {:<12} {}", "", band.recommendation);
    }

    Ok(())
}

fn preset_name(preset: BandPreset) -> &'static str {
    match preset {
        BandPreset::Default => "default",
        BandPreset::Detailed => "detailed",
    }
}
