use anyhow::{bail, Context};
use bytes::Buf;

const MIN_TOPIC_ENTRY_LEN: usize = 2 + 4;

/// Decodes the topic names of a consumer-protocol member assignment.
///
/// Layout: version (i16), topic count (i32), then per topic a length-prefixed name
/// (i16 + UTF-8) and a partition array (i32 count + i32 ids). Trailing user data is
/// ignored.
pub fn decode_assigned_topics(mut assignment: &[u8]) -> Result<Vec<String>, anyhow::Error> {
    if assignment.is_empty() {
        return Ok(Vec::new());
    }

    let _version = read_i16(&mut assignment).context("While reading assignment version")?;
    let topics_count = read_i32(&mut assignment).context("While reading topic count")?;

    let topics_count = topics_count.max(0) as usize;
    // Each entry takes at least a name length and a partition count.
    if topics_count > assignment.remaining() / MIN_TOPIC_ENTRY_LEN {
        bail!(
            "Assignment claims {topics_count} topics, {} bytes left",
            assignment.remaining()
        );
    }

    let mut topics = Vec::with_capacity(topics_count);
    for index in 0..topics_count {
        let name_len = read_i16(&mut assignment)
            .with_context(|| format!("While reading length of topic #{index}"))?;
        if name_len < 0 {
            bail!("Topic #{index} has negative name length {name_len}");
        }
        let name_len = name_len as usize;
        if assignment.remaining() < name_len {
            bail!(
                "Topic #{index} name needs {name_len} bytes, {} left",
                assignment.remaining()
            );
        }
        let name = std::str::from_utf8(&assignment[..name_len])
            .with_context(|| format!("While decoding name of topic #{index}"))?
            .to_owned();
        assignment.advance(name_len);

        let partitions_count = read_i32(&mut assignment)
            .with_context(|| format!("While reading partitions of topic {name}"))?;
        let partitions_len = (partitions_count.max(0) as usize).saturating_mul(4);
        if assignment.remaining() < partitions_len {
            bail!("Partitions of topic {name} are truncated");
        }
        assignment.advance(partitions_len);

        topics.push(name);
    }

    Ok(topics)
}

fn read_i16(buf: &mut &[u8]) -> Result<i16, anyhow::Error> {
    if buf.remaining() < 2 {
        bail!("Unexpected end of assignment");
    }
    Ok(buf.get_i16())
}

fn read_i32(buf: &mut &[u8]) -> Result<i32, anyhow::Error> {
    if buf.remaining() < 4 {
        bail!("Unexpected end of assignment");
    }
    Ok(buf.get_i32())
}
