/// A dated moment in history used as a question prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalEvent {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub description: &'static str,
}

const fn event(year: i32, month: u32, day: u32, description: &'static str) -> HistoricalEvent {
    HistoricalEvent {
        year,
        month,
        day,
        description,
    }
}

// Gregorian dates only; nothing before the 1752 British switchover.
pub const HISTORICAL_EVENTS: &[HistoricalEvent] = &[
    event(1776, 7, 4, "The Declaration of Independence is adopted"),
    event(1789, 7, 14, "The storming of the Bastille"),
    event(1815, 6, 18, "The Battle of Waterloo"),
    event(1859, 11, 24, "On the Origin of Species is published"),
    event(1865, 4, 14, "Abraham Lincoln is shot at Ford's Theatre"),
    event(1903, 12, 17, "The Wright brothers' first powered flight"),
    event(1912, 4, 15, "The Titanic sinks in the North Atlantic"),
    event(1914, 6, 28, "Archduke Franz Ferdinand is assassinated in Sarajevo"),
    event(1918, 11, 11, "The Armistice ends fighting in the First World War"),
    event(1929, 10, 29, "Black Tuesday: the Wall Street crash"),
    event(1941, 12, 7, "The attack on Pearl Harbor"),
    event(1945, 5, 8, "Victory in Europe Day"),
    event(1953, 5, 29, "Hillary and Tenzing reach the summit of Everest"),
    event(1961, 4, 12, "Yuri Gagarin becomes the first human in space"),
    event(1963, 11, 22, "President John F. Kennedy is assassinated in Dallas"),
    event(1969, 7, 20, "Apollo 11 lands on the Moon"),
    event(1989, 11, 9, "The Berlin Wall falls"),
    event(1990, 2, 11, "Nelson Mandela is released from prison"),
    event(1991, 12, 26, "The Soviet Union is dissolved"),
    event(2001, 9, 11, "The September 11 attacks"),
];
