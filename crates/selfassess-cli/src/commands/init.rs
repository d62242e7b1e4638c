//! The `selfassess init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    for (name, content) in [
        ("selfassess.toml", SAMPLE_CONFIG),
        ("questions.txt", SAMPLE_QUESTIONS),
        ("scoring.txt", SAMPLE_SCORING),
    ] {
        if Path::new(name).exists() {
            println!("{name} already exists, skipping.");
        } else {
            std::fs::write(name, content).with_context(|| format!("failed to write {name}"))?;
            println!("Created {name}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Edit questions.txt (one `QUESTION | CATEGORY` per line)");
    println!("  2. Run: selfassess ask");
    println!("  3. Run: selfassess report && selfassess plot");

    Ok(())
}

const SAMPLE_CONFIG: &str = r##"# selfassess configuration

questions = "questions.txt"
scoring = "scoring.txt"
results = "results.txt"
output_dir = "charts"

# "tokens" (time=... 0=3 1=5) or "json" (one object per line)
record_format = "tokens"
low_score_threshold = 3

[categories.mental]
display_name = "Mental"
color = "#4C72B0"

[categories.technique]
display_name = "Technique and Tactics"
color = "#55A868"

[categories.physical]
display_name = "Physical"
color = "#C44E52"
"##;

const SAMPLE_QUESTIONS: &str = "\
I stay calm when I fall behind | mental
I pick the right moment to attack | technique
I have energy left at the end of a match | physical
I keep my focus after a mistake | mental
My footwork keeps me balanced | technique
I recover quickly between rounds | physical
I trust my preparation before a match | mental
I adapt my plan to the opponent | technique
I stay injury free through training blocks | physical
";

const SAMPLE_SCORING: &str = "\
0 = Never
1 = Rarely
2 = Sometimes
3 = Often
4 = Usually
5 = Always
";
