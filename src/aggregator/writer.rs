//! Framing blocks into the output stream.

use super::read_input;
use crate::models::{Block, BlockRecord};
use std::io::{self, Write};
use std::path::PathBuf;

/// Write one block: its header followed by its body.
pub fn write_block<W: Write>(writer: &mut W, block: &Block) -> io::Result<()> {
    writer.write_all(&block.header())?;
    writer.write_all(block.body().as_bytes())
}

/// Read each input in order and write its block to `writer`.
///
/// Read failures become error blocks; only a failure of `writer` itself
/// is returned. `on_block` is called after each block is written.
pub fn write_blocks<W, F>(
    writer: &mut W,
    inputs: &[PathBuf],
    mut on_block: F,
) -> io::Result<Vec<BlockRecord>>
where
    W: Write,
    F: FnMut(&BlockRecord),
{
    let mut records = Vec::with_capacity(inputs.len());

    for path in inputs {
        let block = Block::new(path.clone(), read_input(path));
        write_block(writer, &block)?;

        let record = BlockRecord::from(&block);
        on_block(&record);
        records.push(record);
    }

    Ok(records)
}
