use filter_aaaa_domain::{RecordSet, RecordType, ResponseMessage, Section};
use hickory_proto::dnssec::rdata::DNSSECRData;
use hickory_proto::op::Message;
use hickory_proto::rr::{RData, Record};

fn domain_type(rtype: hickory_proto::rr::RecordType) -> RecordType {
    RecordType::from_u16(u16::from(rtype))
}

/// For RRSIG records, the record type the signature covers.
fn covered_type(record: &Record) -> Option<RecordType> {
    match &record.data {
        RData::DNSSEC(DNSSECRData::RRSIG(rrsig)) => {
            Some(domain_type(rrsig.input().type_covered))
        }
        _ => None,
    }
}

fn sections(message: &Message) -> [(Section, &[Record]); 3] {
    [
        (Section::Answer, message.answers.as_slice()),
        (Section::Authority, message.authorities.as_slice()),
        (Section::Additional, message.additionals.as_slice()),
    ]
}

/// Collapse a message's records into per-section record-set views, one view
/// per (name, type, covered-type) triple. Everything starts visible.
pub fn view_of(message: &Message) -> ResponseMessage {
    let mut view = ResponseMessage::new();

    for (section, records) in sections(message) {
        for record in records {
            let name = record.name.to_utf8();
            let rtype = domain_type(record.record_type());
            let covers = covered_type(record);

            if view.get(section, &name, rtype, covers).is_some() {
                continue;
            }
            let set = match covers {
                Some(covered) => RecordSet::rrsig(&name, covered),
                None => RecordSet::new(&name, rtype),
            };
            view.push(section, set);
        }
    }

    view
}

/// Re-emit a message, dropping every record whose set the view marks
/// suppressed. Records without a view entry pass through, so an untouched
/// view reproduces the input record for record.
pub fn render(message: &Message, view: &ResponseMessage) -> Message {
    let mut out = Message::new(
        message.metadata.id,
        message.metadata.message_type,
        message.metadata.op_code,
    );
    out.metadata.authoritative = message.metadata.authoritative;
    out.metadata.truncation = message.metadata.truncation;
    out.metadata.recursion_desired = message.metadata.recursion_desired;
    out.metadata.recursion_available = message.metadata.recursion_available;
    out.metadata.authentic_data = message.metadata.authentic_data;
    out.metadata.checking_disabled = message.metadata.checking_disabled;
    out.metadata.response_code = message.metadata.response_code;

    for query in &message.queries {
        out.add_query(query.clone());
    }

    let emit = |section: Section, record: &Record| -> bool {
        let name = record.name.to_utf8();
        let rtype = domain_type(record.record_type());
        let covers = covered_type(record);
        view.get(section, &name, rtype, covers)
            .map(|set| !set.suppressed)
            .unwrap_or(true)
    };

    for record in &message.answers {
        if emit(Section::Answer, record) {
            out.add_answer(record.clone());
        }
    }
    for record in &message.authorities {
        if emit(Section::Authority, record) {
            out.add_authority(record.clone());
        }
    }
    for record in &message.additionals {
        if emit(Section::Additional, record) {
            out.add_additional(record.clone());
        }
    }

    if let Some(edns) = message.edns.clone() {
        out.set_edns(edns);
    }

    out
}
