use crate::libwaraqa::numerals::NumeralMode;

/// The grading/shuffle/numeral module embedded in both export targets.
/// Must stay dependency-free: exported documents grade with no server and
/// no runtime library. Verdicts mirror `grade::verdict` case for case; a
/// change in one must land in the other.
pub const RUNTIME_JS: &str = r##"
function makeRuntime(numeralType) {
  "use strict";
  var EASTERN = ["٠", "١", "٢", "٣", "٤", "٥", "٦", "٧", "٨", "٩"];

  function convertDigits(text) {
    if (numeralType !== "eastern") return String(text);
    return String(text).replace(/\d/g, function (d) { return EASTERN[d]; });
  }

  function formatNumber(n) {
    var num = typeof n === "number" && isFinite(n) ? n : 0;
    return convertDigits(String(num));
  }

  // Rewrites digits in text nodes only; element attributes (ids,
  // data-original-index and friends) must stay ASCII.
  function formatText(html) {
    if (!html) return "";
    if (numeralType !== "eastern") return html;
    var div = document.createElement("div");
    div.innerHTML = html;
    var walker = document.createTreeWalker(div, NodeFilter.SHOW_TEXT, null, false);
    var node;
    while ((node = walker.nextNode())) {
      node.nodeValue = convertDigits(node.nodeValue);
    }
    return div.innerHTML;
  }

  // Fisher–Yates permutation of [0, length)
  function shuffle(length) {
    var map = [];
    var i;
    for (i = 0; i < length; i++) map.push(i);
    for (i = map.length - 1; i > 0; i--) {
      var j = Math.floor(Math.random() * (i + 1));
      var tmp = map[i];
      map[i] = map[j];
      map[j] = tmp;
    }
    return map;
  }

  function candidates(field) {
    return String(field || "").split("|").map(function (a) { return a.trim(); });
  }

  var verdicts = {
    "multiple-choice": function (q, r) {
      return r.selected === q.correct;
    },
    "true-false": function (q, r) {
      return r.selected === q.correctAnswer;
    },
    // trimmed, case-sensitive exact membership
    "fill-in-the-blank": function (q, r) {
      return candidates(q.correctAnswer).indexOf(String(r.text || "").trim()) !== -1;
    },
    // substring containment, not exact match
    "short-answer": function (q, r) {
      var input = String(r.text || "").trim();
      return candidates(q.correctAnswer).some(function (a) {
        return input.indexOf(a) !== -1;
      });
    },
    "ordering": function (q, r) {
      if (r.order.length !== q.items.length) return false;
      return r.order.every(function (orig, i) { return orig === i; });
    },
    "matching": function (q, r) {
      if (r.placements.length !== q.pairs.length) return false;
      return r.placements.every(function (occupant, zone) { return occupant === zone; });
    },
    "connecting-lines": function (q, r) {
      if (r.connections.length !== q.pairs.length) return false;
      return r.connections.every(function (c) { return c.promptIndex === c.answerIndex; });
    },
    "classification": function (q, r) {
      if (r.pool !== 0) return false;
      if (r.placed.length !== q.items.length) return false;
      return r.placed.every(function (p) {
        return p.itemGroupId !== "" && p.itemGroupId === p.zoneGroupId;
      });
    }
  };

  function grade(q, r) {
    var check = verdicts[q.type];
    return check ? check(q, r) : false;
  }

  return {
    convertDigits: convertDigits,
    formatNumber: formatNumber,
    formatText: formatText,
    shuffle: shuffle,
    grade: grade,
    PASS_PERCENTAGE: 80
  };
}
"##;

/// The runtime plus its instantiation for the document's numeral mode.
pub fn runtime_script(mode: NumeralMode) -> String {
    format!(
        "{}\nvar runtime = makeRuntime(\"{}\");\n",
        RUNTIME_JS,
        mode.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_is_instantiated_with_the_document_mode() {
        let script = runtime_script(NumeralMode::Western);
        assert!(script.contains("makeRuntime(\"western\")"));
        assert!(script.contains("function makeRuntime"));
    }

    #[test]
    fn runtime_covers_all_eight_types() {
        for kind in crate::libwaraqa::question::ALL_KINDS {
            assert!(
                RUNTIME_JS.contains(&format!("\"{}\"", kind.as_str())),
                "runtime lacks a verdict for {}",
                kind.as_str()
            );
        }
    }
}
