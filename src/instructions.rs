// Copyright 2025 namecheap-pages authors
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt::Write;

use crate::records::{DnsRecord, DomainIdentity, PagesTarget, RecordType};

const RULE: &str = "======================================================================";

/// Dashboard steps for entering the record set by hand.
pub fn manual_instructions(domain: &DomainIdentity, target: &PagesTarget) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "MANUAL CONFIGURATION INSTRUCTIONS");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "1. Log into https://www.namecheap.com");
    let _ = writeln!(out, "2. Dashboard -> Domain List -> \"{domain}\" -> MANAGE");
    let _ = writeln!(out, "3. Open \"Advanced DNS\"");
    let _ = writeln!(out, "4. Delete the existing host records (especially any pointing at the old host)");
    let _ = writeln!(out, "5. Add these records:");
    let _ = writeln!(out);
    out.push_str(&record_table(&target.records()));
    let _ = writeln!(out);
    let _ = writeln!(out, "6. Click \"SAVE ALL CHANGES\"");
    let _ = writeln!(out, "7. Wait 5-30 minutes, then open https://www.{domain}");
    let _ = writeln!(out);
    let _ = writeln!(out, "The @ host is the root domain ({domain}).");
    let _ = writeln!(out, "{RULE}");
    out
}

/// Aligned `Type / Host / Value / TTL` table.
pub fn record_table(records: &[DnsRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "   {:<12}{:<8}{:<24}TTL", "Type", "Host", "Value");
    let _ = writeln!(out, "   {}", "-".repeat(50));
    for record in records {
        let kind = match record.record_type {
            RecordType::A => "A Record",
            RecordType::Cname => "CNAME",
        };
        let _ = writeln!(
            out,
            "   {:<12}{:<8}{:<24}{}",
            kind, record.host, record.value, record.ttl
        );
    }
    out
}
