//! Display sink abstraction
//!
//! The panel is a dumb, transactional byte sink: it never interprets what
//! the server sends, it just latches whatever lands between `begin_write`
//! and `end_write`. Byte order equals transmission order.

pub trait DisplaySink {
    /// Open a write transaction. Blocks while the panel is still busy with
    /// earlier work.
    fn begin_write(&mut self);

    /// Stream one byte into the open transaction.
    fn write_byte(&mut self, byte: u8);

    /// Close the transaction.
    fn end_write(&mut self);

    /// Let the panel finish applying buffered writes and drop into low
    /// power. May block for the panel's internal update time.
    fn flush(&mut self);
}
