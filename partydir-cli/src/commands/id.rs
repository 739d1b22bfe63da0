use partydir_core::stable_id::stable_id;

pub fn run(title: &str, date: &str, venue: &str) {
    println!("{}", stable_id(title, date, venue));
}
