/// A scored row that can live in a [`SessionStore`](super::SessionStore)
/// and be written out as CSV.
pub trait Record {
    /// Column names in declaration order.
    const HEADERS: &'static [&'static str];

    /// File name used when the session is exported.
    const EXPORT_FILE_NAME: &'static str;

    /// Coin name or symbol as entered.
    fn coin(&self) -> &str;

    /// Field values in the same order as [`Record::HEADERS`].
    fn csv_fields(&self) -> Vec<String>;
}
