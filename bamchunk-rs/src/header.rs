use anyhow::Result;
use bstr::BString;
use noodles::sam::Header;
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::Program;
use noodles::sam::header::record::value::map::program::tag;

const PROGRAM_NAME: &str = "bamchunk-rs";

/// Output header: the input header plus an `@PG` line for this run, chained
/// to the last program already present.
pub fn build_header(input: &Header, command_line: &str) -> Result<Header> {
    let mut header = input.clone();
    let previous = last_program_id(&header);
    let id = unique_program_id(&header);

    let mut builder = Map::<Program>::builder()
        .insert(tag::NAME, PROGRAM_NAME)
        .insert(tag::VERSION, env!("CARGO_PKG_VERSION"))
        .insert(tag::COMMAND_LINE, command_line);
    if let Some(pp) = previous {
        builder = builder.insert(tag::PREVIOUS_PROGRAM_ID, pp);
    }

    header.programs_mut().add(id, builder.build()?)?;
    Ok(header)
}

/// The program no other program names as its `PP`.
fn last_program_id(header: &Header) -> Option<BString> {
    let programs = header.programs();
    let programs = programs.as_ref();
    let referenced: Vec<&[u8]> = programs
        .values()
        .filter_map(|pg| pg.other_fields().get(&tag::PREVIOUS_PROGRAM_ID))
        .map(|pp| pp.as_slice())
        .collect();
    programs
        .keys()
        .find(|id| !referenced.contains(&id.as_slice()))
        .or_else(|| programs.keys().next())
        .cloned()
}

fn unique_program_id(header: &Header) -> BString {
    let programs = header.programs();
    let programs = programs.as_ref();
    let mut id = BString::from(PROGRAM_NAME);
    let mut n = 0;
    while programs.contains_key(id.as_slice()) {
        n += 1;
        id = BString::from(format!("{PROGRAM_NAME}.{n}"));
    }
    id
}
