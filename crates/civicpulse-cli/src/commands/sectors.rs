use civicpulse_core::Sector;

pub fn run() {
    println!("{} budget sectors", Sector::ALL.len());
    println!();
    println!("{:<16} {:>14}", "SECTOR", "HOURLY BAND");
    for sector in Sector::ALL {
        let (lo, hi) = sector.band();
        println!("{:<16} {:>7}..{:<6}", sector.name(), lo, hi);
    }
    println!();
    println!("Filter keys are case-insensitive; \"all\" selects every sector.");
}
