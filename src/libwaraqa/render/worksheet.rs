use crate::libwaraqa::config::WorksheetConfig;
use crate::libwaraqa::grade::shuffled_indices;
use crate::libwaraqa::numerals::{format_html, format_number, NumeralMode};
use crate::libwaraqa::question::{MediaContent, Question, QuestionBody};
use crate::libwaraqa::render::html::{embed_json, escape_html};
use crate::libwaraqa::render::runtime::runtime_script;

/// Builds the standalone worksheet document: every question rendered as
/// static markup at generation time, one check-all-at-once grading pass, a
/// results panel and the certificate flow. Only the driver below runs in the
/// browser; all verdicts go through the shared runtime.
pub fn generate(questions: &[Question], config: &WorksheetConfig) -> String {
    let mode = config.numeral_type;
    let title = escape_html(&config.title_or("ورقة عمل تفاعلية"));

    let mut doc = String::with_capacity(64 * 1024 + 8 * 1024 * questions.len());
    doc.push_str("<!DOCTYPE html>\n<html dir=\"rtl\" lang=\"ar\">\n<head>\n");
    doc.push_str("<meta charset=\"UTF-8\" />\n");
    doc.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n");
    doc.push_str(&format!("<title>{}</title>\n", title));
    doc.push_str("<link rel=\"preconnect\" href=\"https://fonts.googleapis.com\" />\n");
    doc.push_str("<link rel=\"preconnect\" href=\"https://fonts.gstatic.com\" crossorigin />\n");
    doc.push_str("<link href=\"https://fonts.googleapis.com/css2?family=Tajawal:wght@400;500;700&display=swap\" rel=\"stylesheet\" />\n");
    doc.push_str("<script src=\"https://cdnjs.cloudflare.com/ajax/libs/html2canvas/1.4.1/html2canvas.min.js\" defer></script>\n");
    doc.push_str("<style>");
    doc.push_str(STYLES);
    doc.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");

    doc.push_str("<header class=\"header\">");
    if let Some(logo) = &config.logo {
        doc.push_str(&format!(
            "<div class=\"header-logo\"><img src=\"{}\" alt=\"{}\"></div>",
            escape_html(logo),
            escape_html(&config.logo_alt)
        ));
    }
    doc.push_str(&format!(
        "<div class=\"header-main\"><h1>{}</h1><p>{}</p></div></header>\n",
        title,
        escape_html(&config.instructions)
    ));

    if config.show_print_button {
        doc.push_str("<div class=\"print-btn-container\"><button onclick=\"window.print()\" class=\"print-btn\">🖨️ طباعة ورقة العمل</button></div>\n");
    }
    if config.use_timer {
        doc.push_str("<div id=\"worksheet-timer\" style=\"display: none;\"></div>\n");
    }

    doc.push_str("<main id=\"questions-container\">\n");
    for (index, question) in questions.iter().enumerate() {
        doc.push_str(&question_block(index, question, mode));
    }
    doc.push_str("</main>\n");
    doc.push_str("<button id=\"check-answers-btn\" class=\"action-button\">تصحيح الإجابات</button>\n");
    doc.push_str("<div id=\"result-panel\" class=\"result-panel\" style=\"display: none;\"></div>\n");
    doc.push_str(&format!(
        "<footer id=\"worksheet-footer\"><p>{}</p></footer>\n</div>\n",
        escape_html(&config.footer)
    ));

    doc.push_str(&certificate_markup(config, &title));

    doc.push_str("<script>\n");
    doc.push_str(&runtime_script(mode));
    doc.push_str(&format!("var questionsData = {};\n", embed_json(&questions)));
    doc.push_str(&format!(
        "var DOC = {{ useTimer: {}, timerMinutes: {}, teacherName: {} }};\n",
        config.use_timer,
        config.timer_minutes(),
        embed_json(&config.teacher_name_or_default())
    ));
    doc.push_str(DRIVER_JS);
    doc.push_str("</script>\n</body>\n</html>");
    doc
}

fn question_block(index: usize, question: &Question, mode: NumeralMode) -> String {
    let mut block = String::with_capacity(2048);
    block.push_str(&format!(
        "<div class=\"question-block\" id=\"question-{}\" data-type=\"{}\">",
        index,
        question.kind().as_str()
    ));
    block.push_str(&format!(
        "<div class=\"question-header\">السؤال {}</div>",
        format_number(mode, (index + 1) as u64)
    ));

    if !question.reading.is_blank() {
        block.push_str("<div class=\"reading-text\">");
        if !question.reading.text.is_empty() {
            block.push_str(&format!("<div>{}</div>", format_html(mode, &question.reading.text)));
        }
        if let Some(image) = &question.reading.image {
            block.push_str(&format!("<img src=\"{}\" alt=\"نص قرائي\">", escape_html(image)));
        }
        if let Some(audio) = &question.reading.audio {
            block.push_str(&format!("<audio src=\"{}\" controls></audio>", escape_html(audio)));
        }
        block.push_str("</div>");
    }

    block.push_str("<div class=\"question-text\">");
    block.push_str(&format_html(mode, &question.question.text));
    if let Some(image) = &question.question.image {
        block.push_str(&format!("<img src=\"{}\" alt=\"صورة السؤال\">", escape_html(image)));
    }
    block.push_str("</div><div class=\"options-container\">");
    block.push_str(&body_markup(index, question, mode));
    block.push_str("</div>");
    block.push_str(&format!(
        "<div id=\"feedback-{}\" class=\"feedback\" style=\"display:none;\"></div></div>\n",
        index
    ));
    block
}

fn body_markup(index: usize, question: &Question, mode: NumeralMode) -> String {
    let mut body = String::with_capacity(1024);
    match &question.body {
        QuestionBody::MultipleChoice { options, .. } => {
            // options come out in a fresh random order; the radio value is
            // always the original index, which is all grading looks at
            for original in shuffled_indices(options.len()) {
                let option = &options[original];
                body.push_str(&format!(
                    "<label class=\"mc-option\"><input type=\"radio\" name=\"q{}\" value=\"{}\"><div class=\"mc-option-content\">{}</div>{}</label>",
                    index,
                    original,
                    format_html(mode, &option.text),
                    inline_image(option, "خيار")
                ));
            }
        }
        QuestionBody::TrueFalse { .. } => {
            body.push_str(&format!(
                "<label class=\"tf-option\"><input type=\"radio\" name=\"q{}\" value=\"true\"> صح</label><label class=\"tf-option\"><input type=\"radio\" name=\"q{}\" value=\"false\"> خطأ</label>",
                index, index
            ));
        }
        QuestionBody::FillInTheBlank { .. } => {
            body.push_str("<input type=\"text\" class=\"fill-blank-input\" placeholder=\"اكتب إجابتك هنا...\">");
        }
        QuestionBody::ShortAnswer { .. } => {
            body.push_str("<textarea class=\"short-answer-input\" rows=\"3\" placeholder=\"اكتب إجابتك هنا...\"></textarea>");
        }
        QuestionBody::Ordering { items } => {
            body.push_str("<div class=\"ordering-container\">");
            for original in shuffled_indices(items.len()) {
                let item = &items[original];
                body.push_str(&format!(
                    "<div class=\"ordering-item\" draggable=\"true\" data-original-index=\"{}\">{}<span>{}</span></div>",
                    original,
                    inline_image(item, "عنصر"),
                    format_html(mode, &item.text)
                ));
            }
            body.push_str("</div>");
        }
        QuestionBody::Matching { pairs } => {
            body.push_str("<div class=\"matching-container\"><div class=\"matching-column\">");
            for (zone, pair) in pairs.iter().enumerate() {
                body.push_str(&format!(
                    "<div class=\"matching-prompt-item\"><div class=\"prompt-content\">{}{}</div><div class=\"drop-zone\" data-index=\"{}\"></div></div>",
                    inline_image(&pair.prompt, "طرف أول"),
                    format_html(mode, &pair.prompt.text),
                    zone
                ));
            }
            body.push_str("</div><div class=\"matching-column answers-column\">");
            for original in shuffled_indices(pairs.len()) {
                let answer = &pairs[original].answer;
                body.push_str(&format!(
                    "<div class=\"answer-item\" draggable=\"true\" data-original-index=\"{}\">{}{}</div>",
                    original,
                    inline_image(answer, "طرف ثان"),
                    format_html(mode, &answer.text)
                ));
            }
            body.push_str("</div></div>");
        }
        QuestionBody::ConnectingLines { pairs } => {
            body.push_str(&format!(
                "<div class=\"connecting-container\" data-question=\"{}\"><svg id=\"connection-svg-{}\" class=\"connection-svg\"></svg><div class=\"column\">",
                index, index
            ));
            for (i, pair) in pairs.iter().enumerate() {
                body.push_str(&format!(
                    "<div class=\"connect-item\" data-column=\"prompt\" data-index=\"{}\">{}{}</div>",
                    i,
                    inline_image(&pair.prompt, "طرف أول"),
                    format_html(mode, &pair.prompt.text)
                ));
            }
            body.push_str("</div><div class=\"column\">");
            for original in shuffled_indices(pairs.len()) {
                let answer = &pairs[original].answer;
                body.push_str(&format!(
                    "<div class=\"connect-item\" data-column=\"answer\" data-index=\"{}\">{}{}</div>",
                    original,
                    inline_image(answer, "طرف ثان"),
                    format_html(mode, &answer.text)
                ));
            }
            body.push_str("</div></div>");
        }
        QuestionBody::Classification { groups, items } => {
            body.push_str("<div class=\"classification-container\"><div class=\"classification-groups\">");
            for group in groups {
                body.push_str(&format!(
                    "<div class=\"group-box\"><div class=\"group-header\">{}</div><div class=\"group-drop-zone\" data-group-id=\"{}\"></div></div>",
                    format_html(mode, &group.text),
                    escape_html(&group.id)
                ));
            }
            body.push_str("</div><div class=\"classification-items\">");
            for original in shuffled_indices(items.len()) {
                let item = &items[original];
                body.push_str(&format!(
                    "<div class=\"class-item\" draggable=\"true\" data-group-id=\"{}\">{}<span>{}</span></div>",
                    escape_html(&item.group_id),
                    inline_image(&item.content, "عنصر"),
                    format_html(mode, &item.content.text)
                ));
            }
            body.push_str("</div></div>");
        }
    }
    body
}

fn inline_image(content: &MediaContent, alt: &str) -> String {
    match &content.image {
        Some(image) => format!("<img src=\"{}\" alt=\"{}\">", escape_html(image), alt),
        None => String::new(),
    }
}

fn certificate_markup(config: &WorksheetConfig, title: &str) -> String {
    let mut markup = String::with_capacity(2048);
    markup.push_str(concat!(
        "<div class=\"config-panel\" id=\"certificateForm\">",
        "<h3>بيانات الشهادة</h3>",
        "<div class=\"form-group\"><label for=\"studentNameInput\">اسم الطالب:</label>",
        "<input class=\"form-control\" id=\"studentNameInput\" type=\"text\" placeholder=\"أدخل اسم الطالب\" /></div>",
        "<div class=\"form-group form-buttons\">",
        "<button class=\"certificate-btn confirm\" onclick=\"generateCertificate()\">إنشاء الشهادة</button>",
        "<button class=\"certificate-btn close\" onclick=\"closeCertificateForm()\">إغلاق</button></div></div>\n"
    ));

    markup.push_str("<div class=\"certificate-container\" id=\"certificateContainer\"><div class=\"certificate-header\">");
    if let Some(logo) = &config.logo {
        markup.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" class=\"certificate-logo\" />",
            escape_html(logo),
            escape_html(&config.logo_alt)
        ));
    }
    markup.push_str(&format!(
        "<h2 class=\"certificate-quiz-title\">{}</h2></div>",
        title
    ));
    markup.push_str(concat!(
        "<h1 class=\"certificate-title\">شهادة إنجاز</h1>",
        "<div class=\"certificate-body\">",
        "<div class=\"student-name\" id=\"certificateStudentName\"></div>",
        "<div class=\"achievement-text\">تهانينا! لقد أتممت ورقة العمل التفاعلية بنجاح</div>",
        "<div class=\"score-text\" id=\"certificateScoreText\"></div>",
        "<div class=\"achievement-text\">نظير جهودك المتميزة، نقدم لك هذه الشهادة تقديرًا لإنجازك.</div>",
        "<div class=\"teacher-name\" id=\"certificateTeacherName\"></div></div>",
        "<div class=\"certificate-footer\"><p>شهادة معتمدة من نظام الاختبارات التفاعلية</p></div>"
    ));
    if let Some(seal) = &config.seal {
        markup.push_str(&format!(
            "<img src=\"{}\" class=\"certificate-seal\" alt=\"ختم\"/>",
            escape_html(seal)
        ));
    }
    markup.push_str(concat!(
        "<div class=\"certificate-buttons\">",
        "<button class=\"certificate-btn print\" onclick=\"printCertificate()\">🖨️ طباعة</button>",
        "<button class=\"certificate-btn confirm\" onclick=\"downloadCertificate()\">📥 حفظ كصورة</button>",
        "<button class=\"certificate-btn close\" onclick=\"closeCertificate()\">✕ إغلاق</button></div></div>\n"
    ));
    markup
}

const STYLES: &str = "\
body { font-family: 'Tajawal', sans-serif; background-color: #f4f7f6; color: #333; margin: 0; padding: 15px; direction: rtl; line-height: 1.6; }\
input, button, textarea, select { font-family: 'Tajawal', sans-serif; }\
.container { max-width: 900px; margin: 0 auto; background-color: #fff; padding: 20px 30px; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.08); box-sizing: border-box; }\
#worksheet-timer { text-align: center; font-size: 1.4em; font-weight: 700; color: #dc3545; background-color: #f8d7da; padding: 10px; border-radius: 8px; margin-bottom: 20px; border: 1px solid #f5c6cb; }\
.header { display: flex; align-items: center; justify-content: space-between; border-bottom: 2px solid #eee; padding-bottom: 20px; margin-bottom: 30px; gap: 20px; }\
.header-logo img { max-width: 120px; max-height: 100px; object-fit: contain; }\
.header-main { text-align: center; flex-grow: 1; }\
.header-main h1 { margin: 0; color: #0056b3; font-size: 1.8em; }\
.header-main p { margin: 5px 0 0; color: #555; font-size: 1.1em; white-space: pre-wrap; }\
.question-block { margin-bottom: 30px; padding: 20px; border: 1px solid #e0e0e0; border-radius: 10px; background-color: #fdfdfd; overflow-wrap: break-word; page-break-inside: avoid; break-inside: avoid; }\
.question-header { font-size: 1.3em; font-weight: 700; color: #333; margin-bottom: 15px; }\
.question-block img, .mc-option img { max-width: 100%; height: auto; max-height: 300px; object-fit: contain; display: block; margin: 10px auto; border-radius: 8px; }\
.question-text, .reading-text { font-size: 1.15em; margin-bottom: 15px; }\
audio { width: 100%; margin-top: 10px; }\
.options-container { display: flex; flex-direction: column; gap: 10px; }\
.mc-option { display: flex; align-items: center; gap: 10px; padding: 12px; border: 1px solid #ccc; border-radius: 8px; cursor: pointer; transition: background-color 0.2s; }\
.mc-option:hover { background-color: #f0f0f0; }\
.mc-option input[type=radio] { flex-shrink: 0; width: 18px; height: 18px; margin-left: 8px; }\
.fill-blank-input, .short-answer-input { width: 100%; padding: 12px; font-size: 1em; border: 1px solid #ccc; border-radius: 6px; box-sizing: border-box; }\
.fill-blank-input.correct, .short-answer-input.correct { border-color: #28a745; background-color: #e6f7ec; }\
.fill-blank-input.wrong, .short-answer-input.wrong { border-color: #dc3545; background-color: #fdecea; }\
.tf-option { display: inline-flex; align-items: center; gap: 8px; margin-left: 20px; padding: 5px; cursor: pointer; }\
.tf-option input[type=radio] { width: 18px; height: 18px; }\
.classification-container { display: flex; flex-direction: column; gap: 20px; }\
.classification-groups { display: flex; flex-wrap: wrap; gap: 15px; justify-content: center; margin-bottom: 20px; }\
.group-box { flex: 1; min-width: 200px; background-color: #f8f9fa; border: 2px solid #0056b3; border-radius: 12px; padding: 10px; display: flex; flex-direction: column; }\
.group-header { background-color: #0056b3; color: white; padding: 8px; text-align: center; border-radius: 8px 8px 0 0; font-weight: bold; margin: -10px -10px 10px -10px; }\
.group-drop-zone { min-height: 100px; background-color: #fff; border: 2px dashed #ccc; border-radius: 8px; padding: 8px; display: flex; flex-wrap: wrap; gap: 8px; align-content: flex-start; transition: background-color 0.2s; }\
.group-drop-zone.over { background-color: #e3f2fd; border-color: #2196f3; }\
.classification-items { display: flex; flex-wrap: wrap; gap: 10px; justify-content: center; padding: 15px; background-color: #f1f1f1; border-radius: 12px; border: 1px solid #ddd; min-height: 60px; }\
.class-item { padding: 8px 15px; background-color: #fff; border: 1px solid #999; border-radius: 20px; cursor: grab; user-select: none; box-shadow: 0 2px 4px rgba(0,0,0,0.1); font-weight: 500; display: flex; align-items: center; gap: 5px; }\
.class-item img { max-height: 40px; margin: 0; }\
.class-item.dragging { opacity: 0.5; }\
.class-item.correct { background-color: #d4edda; border-color: #28a745; color: #155724; }\
.class-item.wrong { background-color: #f8d7da; border-color: #dc3545; color: #721c24; }\
.matching-container, .connecting-container { display: flex; flex-wrap: wrap; gap: 20px; justify-content: space-between; margin-bottom: 20px; }\
.matching-column, .column { flex: 1; min-width: 280px; display: flex; flex-direction: column; gap: 10px; }\
.matching-prompt-item { display: flex; flex-direction: column; gap: 10px; padding: 15px; background-color: #f8f9fa; border-radius: 8px; border: 1px solid #e0e0e0; }\
.prompt-content { text-align: center; font-weight: 600; }\
.drop-zone { min-height: 60px; border: 2px dashed #bbb; border-radius: 8px; background-color: #fff; transition: all 0.2s; display: flex; align-items: center; justify-content: center; padding: 5px; }\
.drop-zone.over { background-color: #e3f2fd; border-color: #2196f3; }\
.drop-zone.correct { border-color: #28a745; background-color: #d4edda; }\
.drop-zone.wrong { border-color: #dc3545; background-color: #f8d7da; }\
.answer-item, .ordering-item { width: 100%; box-sizing: border-box; padding: 12px; background-color: #fff; border: 1px solid #007bff; border-radius: 8px; cursor: grab; text-align: center; user-select: none; box-shadow: 0 2px 4px rgba(0,0,0,0.05); touch-action: none; }\
.answer-item:active, .ordering-item:active { cursor: grabbing; opacity: 0.8; }\
.answer-item img, .ordering-item img, .connect-item img { max-height: 80px; display: block; margin: 0 auto 5px; max-width: 100%; }\
.ordering-container { display: flex; flex-direction: column; gap: 10px; padding: 15px; border: 2px solid #eee; border-radius: 8px; min-height: 100px; }\
.ordering-item { display: flex; align-items: center; gap: 15px; border-color: #ccc; }\
.ordering-item::before { content: '☰'; font-size: 1.4em; color: #999; cursor: grab; padding: 0 10px; }\
.ordering-item.dragging { opacity: 0.5; }\
.ordering-container.correct { border-color: #28a745; background-color: #f0fff4; }\
.ordering-container.wrong { border-color: #dc3545; background-color: #fff5f5; }\
.connecting-container { position: relative; }\
.connection-svg { position: absolute; top: 0; left: 0; width: 100%; height: 100%; pointer-events: none; z-index: 1; }\
.connect-item { padding: 12px; border: 1px solid #ccc; border-radius: 6px; background-color: #fff; cursor: pointer; display: flex; align-items: center; gap: 10px; z-index: 2; min-height: 50px; }\
.connect-item.selected { border: 2px solid #007bff; background-color: #e7f3ff; }\
.connect-item.connect-correct { background-color: #e6f7ec; border-color: #28a745; }\
.connect-item.connect-wrong { background-color: #fdecea; border-color: #dc3545; }\
.feedback { margin-top: 15px; padding: 12px; border-radius: 8px; border: 1px solid; }\
.feedback.correct { background-color: #e6f7ec; border-color: #28a745; color: #1d643b; }\
.feedback.incorrect { background-color: #fff3cd; border-color: #ffc107; color: #856404; }\
.correct-order-display { background-color: #fff3cd; color: #856404; padding: 10px 15px; border-radius: 8px; margin-top: 15px; border: 1px solid #ffeeba; text-align: right; }\
.correct-order-display ol { padding-right: 20px; margin: 5px 0; }\
.correct-answer-display { background-color: #e9f7ef; color: #2b6447; padding: 10px 15px; border-radius: 8px; font-weight: 600; margin-top: 10px; border: 1px solid #c3e6cb; }\
.action-button { display: block; width: 100%; max-width: 300px; margin: 40px auto 20px; padding: 15px 20px; font-size: 1.2em; font-weight: 700; color: #fff; background-color: #28a745; border: none; border-radius: 8px; cursor: pointer; transition: background-color 0.3s; }\
.action-button:hover { background-color: #218838; }\
.result-panel { text-align: center; padding: 20px; margin-top: 30px; border-radius: 8px; }\
.result-panel.success { background-color: #d4edda; color: #155724; }\
.result-panel.failure { background-color: #f8d7da; color: #721c24; }\
.result-buttons { display: flex; flex-wrap: wrap; justify-content: center; gap: 10px; margin-top: 15px; }\
.config-panel, .certificate-container { display: none; position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); background: white; padding: 25px; border-radius: 12px; box-shadow: 0 10px 30px rgba(0,0,0,0.3); z-index: 1000; width: 90%; max-width: 600px; text-align: right; max-height: 90vh; overflow-y: auto; }\
.config-panel h3 { text-align: center; }\
.config-panel .form-group { margin-bottom: 1rem; }\
.form-control { width: 100%; padding: 12px; border-radius: 8px; border: 1px solid #ccc; font-size: 1em; box-sizing: border-box; }\
.form-buttons { display: flex; justify-content: center; gap: 15px; }\
.certificate-container { max-width: 800px; border: 10px solid #007bff; border-radius: 16px; padding: 30px; position: fixed; text-align: center; color: #212529; box-sizing: border-box; }\
.certificate-header { display: flex; flex-direction: column; align-items: center; gap: 15px; margin-bottom: 10px; }\
.certificate-logo { max-width: 100px; max-height: 100px; object-fit: contain; }\
.certificate-quiz-title { color: #343a40; font-size: 1.5em; font-weight: 500; margin: 0; }\
.certificate-title { color: #007bff; font-size: 2.8em; font-weight: bold; margin: 15px 0 20px 0; }\
.certificate-body { margin: 30px 0; padding: 20px; border: 2px dashed #007bff; border-radius: 12px; background: #f8f9fa; }\
.student-name { font-size: 2em; color: #0056b3; margin: 20px 0; font-weight: bold; word-break: break-word; }\
.achievement-text { font-size: 1.3em; color: #212529; margin: 15px 0; }\
.score-text { font-size: 1.4em; color: #28a745; font-weight: bold; margin: 8px 0; }\
.teacher-name { font-size: 1.3em; color: #0056b3; margin-top: 30px; }\
.certificate-footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #ccc; color: #666; font-size: 0.9em; }\
.certificate-seal { position: absolute; left: 30px; bottom: 50px; max-width: 120px; max-height: 120px; opacity: 0.9; object-fit: contain; z-index: 10; }\
.certificate-buttons { margin-top: 25px; display: flex; flex-wrap: wrap; justify-content: center; gap: 15px; }\
.certificate-btn, .restart-btn { padding: 12px 25px; font-size: 1.1em; font-weight: 600; border-radius: 8px; border: none; cursor: pointer; transition: all 0.2s ease; color: #fff; }\
.certificate-btn.print { background: #007bff; }\
.certificate-btn.confirm { background: #28a745; }\
.certificate-btn.close { background: #6c757d; }\
.restart-btn { background: #6c757d; }\
.certificate-btn:hover, .restart-btn:hover { filter: brightness(90%); }\
#worksheet-footer { text-align: center; margin-top: 20px; color: #6c757d; white-space: pre-wrap; }\
.print-btn-container { text-align: center; margin-bottom: 20px; }\
.print-btn { background-color: #333; color: #fff; border: none; padding: 10px 20px; border-radius: 5px; cursor: pointer; display: inline-flex; align-items: center; gap: 8px; }\
.print-btn:hover { background-color: #555; }\
@media print { \
body { margin: 0; padding: 0; background-color: #fff; -webkit-print-color-adjust: exact; print-color-adjust: exact; } \
body.print-certificate-mode > * { display: none !important; } \
body.print-certificate-mode .certificate-container-print-wrapper { display: block !important; position: absolute; top: 0; left: 0; width: 100% !important; background: white; z-index: 9999; } \
body.print-certificate-mode .certificate-container-print-wrapper .certificate-container { display: block !important; width: 100% !important; max-width: 100% !important; box-shadow: none !important; margin: 0 auto !important; padding: 20px !important; position: relative !important; left: auto !important; top: auto !important; transform: none !important; } \
body.print-certificate-mode .certificate-buttons { display: none !important; } \
body:not(.print-certificate-mode) .action-button, \
body:not(.print-certificate-mode) #worksheet-footer, \
body:not(.print-certificate-mode) #result-panel, \
body:not(.print-certificate-mode) #worksheet-timer, \
body:not(.print-certificate-mode) .config-panel, \
body:not(.print-certificate-mode) .print-btn-container, \
body:not(.print-certificate-mode) .certificate-container { display: none !important; } \
body:not(.print-certificate-mode) .container { width: 100%; max-width: 100%; box-shadow: none; border: none; padding: 20px; margin: 0; } \
body:not(.print-certificate-mode) .question-block { border: 1px solid #ccc; break-inside: avoid; page-break-inside: avoid; margin-bottom: 15px; padding: 15px; } \
}";

const DRIVER_JS: &str = r##"
var draggedElement = null;
var connections = {};
var selectedConnector = null;
var timerInterval = null;
var finalScore = null;

function questionBlock(index) {
  return document.getElementById("question-" + index);
}

function getDragAfterElement(container, y) {
  var closest = { offset: Number.NEGATIVE_INFINITY, element: null };
  container.querySelectorAll(".ordering-item:not(.dragging)").forEach(function (child) {
    var box = child.getBoundingClientRect();
    var offset = y - box.top - box.height / 2;
    if (offset < 0 && offset > closest.offset) {
      closest = { offset: offset, element: child };
    }
  });
  return closest.element;
}

function handleDragStart(e) {
  draggedElement = e.target;
  e.dataTransfer.effectAllowed = "move";
  e.dataTransfer.setData("text/plain", "");
  setTimeout(function () { e.target.classList.add("dragging"); }, 0);
}

function handleDragEnd(e) {
  if (e.target) e.target.classList.remove("dragging");
  draggedElement = null;
  document.querySelectorAll(".drop-zone, .group-drop-zone").forEach(function (el) {
    el.classList.remove("over");
  });
}

function handleDragOver(e) {
  e.preventDefault();
  var dropZone = e.target.closest(".drop-zone") || e.target.closest(".group-drop-zone");
  if (dropZone) dropZone.classList.add("over");
  var orderingContainer = e.target.closest(".ordering-container");
  if (orderingContainer && draggedElement && draggedElement.classList.contains("ordering-item")) {
    var afterElement = getDragAfterElement(orderingContainer, e.clientY);
    if (afterElement == null) orderingContainer.appendChild(draggedElement);
    else orderingContainer.insertBefore(draggedElement, afterElement);
  }
}

function handleDragLeave(e) {
  var dropZone = e.target.closest(".drop-zone") || e.target.closest(".group-drop-zone");
  if (dropZone) dropZone.classList.remove("over");
}

function handleDrop(e) {
  e.preventDefault();
  var dropZone = e.target.closest(".drop-zone");
  var groupDropZone = e.target.closest(".group-drop-zone");
  if (dropZone && draggedElement && draggedElement.classList.contains("answer-item")) {
    dropZone.classList.remove("over");
    if (dropZone.children.length > 0) {
      // a drop displaces the current occupant back to the answer pool
      var existing = dropZone.firstElementChild;
      var qBlock = dropZone.closest(".question-block");
      var answersCol = qBlock.querySelector(".answers-column");
      if (answersCol) answersCol.appendChild(existing);
    }
    dropZone.appendChild(draggedElement);
  } else if (groupDropZone && draggedElement && draggedElement.classList.contains("class-item")) {
    groupDropZone.classList.remove("over");
    groupDropZone.appendChild(draggedElement);
  }
}

function handleConnectorClick(e, qIndex) {
  var item = e.target.closest(".connect-item");
  if (!item) return;
  if (!connections[qIndex]) connections[qIndex] = [];
  var column = item.dataset.column;
  var index = parseInt(item.dataset.index, 10);
  var existing = connections[qIndex].find(function (c) {
    return column === "prompt" ? c.promptIndex === index : c.answerIndex === index;
  });
  if (selectedConnector) {
    if (selectedConnector.dataset.column === column) return;
    if (existing) return;
    var promptIndex = column === "prompt" ? index : parseInt(selectedConnector.dataset.index, 10);
    var answerIndex = column === "answer" ? index : parseInt(selectedConnector.dataset.index, 10);
    connections[qIndex].push({ promptIndex: promptIndex, answerIndex: answerIndex });
    selectedConnector.classList.remove("selected");
    selectedConnector = null;
    drawConnections(qIndex);
  } else if (existing) {
    // clicking a connected node first disconnects it
    connections[qIndex] = connections[qIndex].filter(function (c) { return c !== existing; });
    drawConnections(qIndex);
  } else {
    selectedConnector = item;
    item.classList.add("selected");
  }
}

function drawConnections(qIndex, showFeedback) {
  var svg = document.getElementById("connection-svg-" + qIndex);
  if (!svg) return;
  var container = svg.parentElement;
  svg.innerHTML = "";
  (connections[qIndex] || []).forEach(function (conn) {
    var startElem = container.querySelector('[data-column="prompt"][data-index="' + conn.promptIndex + '"]');
    var endElem = container.querySelector('[data-column="answer"][data-index="' + conn.answerIndex + '"]');
    if (!startElem || !endElem) return;
    var startRect = startElem.getBoundingClientRect();
    var endRect = endElem.getBoundingClientRect();
    var containerRect = container.getBoundingClientRect();
    var line = document.createElementNS("http://www.w3.org/2000/svg", "line");
    line.setAttribute("x1", startRect.left - containerRect.left);
    line.setAttribute("y1", startRect.top + startRect.height / 2 - containerRect.top);
    line.setAttribute("x2", endRect.right - containerRect.left);
    line.setAttribute("y2", endRect.top + endRect.height / 2 - containerRect.top);
    var color = "#007bff";
    if (showFeedback) color = conn.promptIndex === conn.answerIndex ? "#28a745" : "#dc3545";
    line.setAttribute("stroke", color);
    line.setAttribute("stroke-width", "3");
    svg.appendChild(line);
  });
}

function wireQuestions() {
  questionsData.forEach(function (q, index) {
    var block = questionBlock(index);
    if (!block) return;
    if (q.type === "matching") {
      block.querySelectorAll(".answer-item").forEach(function (el) {
        el.addEventListener("dragstart", handleDragStart);
        el.addEventListener("dragend", handleDragEnd);
      });
      block.querySelectorAll(".drop-zone").forEach(function (el) {
        el.addEventListener("dragover", handleDragOver);
        el.addEventListener("dragleave", handleDragLeave);
        el.addEventListener("drop", handleDrop);
      });
    }
    if (q.type === "ordering") {
      var container = block.querySelector(".ordering-container");
      container.addEventListener("dragover", handleDragOver);
      container.querySelectorAll(".ordering-item").forEach(function (item) {
        item.addEventListener("dragstart", handleDragStart);
        item.addEventListener("dragend", handleDragEnd);
      });
    }
    if (q.type === "classification") {
      block.querySelectorAll(".class-item").forEach(function (el) {
        el.addEventListener("dragstart", handleDragStart);
        el.addEventListener("dragend", handleDragEnd);
      });
      block.querySelectorAll(".group-drop-zone").forEach(function (el) {
        el.addEventListener("dragover", handleDragOver);
        el.addEventListener("dragleave", handleDragLeave);
        el.addEventListener("drop", handleDrop);
      });
      var pool = block.querySelector(".classification-items");
      pool.addEventListener("dragover", handleDragOver);
      pool.addEventListener("drop", function (e) {
        e.preventDefault();
        var dragged = document.querySelector(".class-item.dragging");
        if (dragged) pool.appendChild(dragged);
      });
    }
    if (q.type === "connecting-lines") {
      block.querySelector(".connecting-container").addEventListener("click", function (e) {
        handleConnectorClick(e, index);
      });
    }
  });
  document.getElementById("check-answers-btn").addEventListener("click", checkAnswers);
}

// Reads the current arrangement out of the DOM as plain data for the
// shared runtime. No comparison logic lives here.
function readResponse(q, index, block) {
  switch (q.type) {
    case "multiple-choice": {
      var checked = block.querySelector('input[name="q' + index + '"]:checked');
      return { selected: checked ? parseInt(checked.value, 10) : -1 };
    }
    case "true-false": {
      var picked = block.querySelector('input[name="q' + index + '"]:checked');
      return { selected: picked ? picked.value === "true" : null };
    }
    case "fill-in-the-blank":
      return { text: block.querySelector(".fill-blank-input").value };
    case "short-answer":
      return { text: block.querySelector(".short-answer-input").value };
    case "ordering": {
      var order = [];
      block.querySelectorAll(".ordering-item").forEach(function (item) {
        order.push(parseInt(item.dataset.originalIndex, 10));
      });
      return { order: order };
    }
    case "matching": {
      var placements = [];
      block.querySelectorAll(".drop-zone").forEach(function (zone) {
        var occupant = zone.querySelector(".answer-item");
        placements[parseInt(zone.dataset.index, 10)] =
          occupant ? parseInt(occupant.dataset.originalIndex, 10) : null;
      });
      return { placements: placements };
    }
    case "connecting-lines":
      return { connections: connections[index] || [] };
    case "classification": {
      var placed = [];
      block.querySelectorAll(".group-drop-zone").forEach(function (zone) {
        zone.querySelectorAll(".class-item").forEach(function (item) {
          placed.push({ itemGroupId: item.dataset.groupId, zoneGroupId: zone.dataset.groupId });
        });
      });
      var pool = block.querySelector(".classification-items");
      return { pool: pool.children.length, placed: placed };
    }
    default:
      return {};
  }
}

function paintVerdict(q, index, block, response, isCorrect) {
  if (q.type === "ordering") {
    var container = block.querySelector(".ordering-container");
    container.classList.add(isCorrect ? "correct" : "wrong");
    container.querySelectorAll(".ordering-item").forEach(function (item) { item.draggable = false; });
    if (!isCorrect) {
      var display = document.createElement("div");
      display.className = "correct-order-display";
      var html = "<strong>الترتيب الصحيح:</strong><ol>";
      q.items.forEach(function (it) { html += "<li>" + runtime.formatText(it.text || "") + "</li>"; });
      display.innerHTML = html + "</ol>";
      container.parentElement.appendChild(display);
    }
  } else if (q.type === "matching") {
    block.querySelectorAll(".drop-zone").forEach(function (zone) {
      var occupant = zone.querySelector(".answer-item");
      var ok = occupant && parseInt(occupant.dataset.originalIndex, 10) === parseInt(zone.dataset.index, 10);
      zone.classList.add(ok ? "correct" : "wrong");
      if (occupant) occupant.draggable = false;
    });
  } else if (q.type === "classification") {
    block.querySelectorAll(".group-drop-zone").forEach(function (zone) {
      zone.querySelectorAll(".class-item").forEach(function (item) {
        item.classList.add(item.dataset.groupId === zone.dataset.groupId ? "correct" : "wrong");
        item.draggable = false;
      });
    });
    block.querySelectorAll(".classification-items .class-item").forEach(function (item) {
      item.classList.add("wrong");
      item.draggable = false;
    });
  } else if (q.type === "connecting-lines") {
    drawConnections(index, true);
    block.querySelectorAll(".connect-item").forEach(function (el) { el.style.pointerEvents = "none"; });
  } else if (q.type === "fill-in-the-blank" || q.type === "short-answer") {
    var field = block.querySelector(".fill-blank-input, .short-answer-input");
    field.disabled = true;
    field.classList.add(isCorrect ? "correct" : "wrong");
    if (!isCorrect) {
      var answer = document.createElement("div");
      answer.className = "correct-answer-display";
      answer.textContent = "الإجابة الصحيحة: " + (q.correctAnswer || "").split("|")[0].trim();
      field.parentElement.appendChild(answer);
    }
  } else {
    block.querySelectorAll('input[type="radio"]').forEach(function (radio) { radio.disabled = true; });
  }
  var feedbackDiv = document.getElementById("feedback-" + index);
  if (q.feedback && feedbackDiv) {
    feedbackDiv.innerHTML = runtime.formatText(q.feedback);
    feedbackDiv.className = "feedback " + (isCorrect ? "correct" : "incorrect");
    feedbackDiv.style.display = "block";
  }
}

function checkAnswers() {
  var score = 0;
  questionsData.forEach(function (q, index) {
    var block = questionBlock(index);
    if (!block) return;
    var response = readResponse(q, index, block);
    var isCorrect = runtime.grade(q, response);
    if (isCorrect) score++;
    paintVerdict(q, index, block, response, isCorrect);
  });
  displayResult(score, questionsData.length);
}

function displayResult(score, total) {
  var panel = document.getElementById("result-panel");
  var percentage = total > 0 ? Math.round((score / total) * 100) : 0;
  finalScore = { score: score, total: total, percentage: percentage };
  var message = "<h2>نتيجتك: " + runtime.formatNumber(score) + " من " + runtime.formatNumber(total) +
    " (" + runtime.formatNumber(percentage) + "%)</h2>";
  var buttons = '<div class="result-buttons">';
  if (percentage >= runtime.PASS_PERCENTAGE) {
    panel.className = "result-panel success";
    message += "<p>ممتاز! لقد اجتزت ورقة العمل بنجاح.</p>";
    buttons += '<button class="certificate-btn confirm" onclick="openCertificateForm()">🏆 الحصول على شهادة إنجاز</button>';
  } else {
    panel.className = "result-panel failure";
    message += "<p>للحصول على شهادة، يجب تحقيق " + runtime.formatNumber(runtime.PASS_PERCENTAGE) +
      "% على الأقل. حاول مرة أخرى!</p>";
  }
  buttons += '<button class="restart-btn" onclick="location.reload()">إعادة المحاولة</button></div>';
  panel.innerHTML = message + buttons;
  panel.style.display = "block";
  document.getElementById("check-answers-btn").style.display = "none";
}

function startWorksheetTimer() {
  if (!DOC.useTimer) return;
  var timerElement = document.getElementById("worksheet-timer");
  if (!timerElement) return;
  timerElement.style.display = "block";
  var duration = DOC.timerMinutes * 60;
  timerInterval = setInterval(function () {
    var minutes = Math.floor(duration / 60);
    var seconds = duration % 60;
    var padded = (seconds < 10 ? "0" : "") + seconds;
    timerElement.textContent =
      "الوقت المتبقي: " + runtime.formatNumber(minutes) + ":" + runtime.convertDigits(padded);
    if (--duration < 0) {
      clearInterval(timerInterval);
      alert("انتهى الوقت! سيتم إعادة تحميل الصفحة.");
      location.reload();
    }
  }, 1000);
}

function openCertificateForm() {
  document.getElementById("certificateForm").style.display = "block";
}
function closeCertificateForm() {
  document.getElementById("certificateForm").style.display = "none";
}
function closeCertificate() {
  document.getElementById("certificateContainer").style.display = "none";
}
function generateCertificate() {
  var studentName = document.getElementById("studentNameInput").value.trim();
  if (!studentName) {
    alert("الرجاء إدخال اسم الطالب.");
    return;
  }
  document.getElementById("certificateStudentName").textContent = studentName;
  document.getElementById("certificateTeacherName").textContent = "المعلم: " + DOC.teacherName;
  if (finalScore) {
    document.getElementById("certificateScoreText").textContent =
      "حققت نتيجة " + runtime.formatNumber(finalScore.score) + " من " +
      runtime.formatNumber(finalScore.total) + " (" + runtime.formatNumber(finalScore.percentage) + "%)";
  }
  closeCertificateForm();
  document.getElementById("certificateContainer").style.display = "block";
}
function printCertificate() {
  document.body.classList.add("print-certificate-mode");
  var cert = document.getElementById("certificateContainer");
  var wrapper = document.createElement("div");
  wrapper.className = "certificate-container-print-wrapper";
  wrapper.appendChild(cert.cloneNode(true));
  document.body.appendChild(wrapper);
  setTimeout(function () {
    window.print();
    document.body.removeChild(wrapper);
    document.body.classList.remove("print-certificate-mode");
  }, 100);
}
function downloadCertificate() {
  var cert = document.getElementById("certificateContainer");
  var buttons = cert.querySelector(".certificate-buttons");
  if (buttons) buttons.style.display = "none";
  html2canvas(cert, { scale: 2, useCORS: true, logging: false })
    .then(function (canvas) {
      var link = document.createElement("a");
      link.download = "certificate.png";
      link.href = canvas.toDataURL("image/png");
      link.click();
    })
    .finally(function () {
      if (buttons) buttons.style.display = "flex";
    });
}

document.addEventListener("DOMContentLoaded", function () {
  wireQuestions();
  startWorksheetTimer();
});
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libwaraqa::question::ReadingContent;

    fn media(text: &str) -> MediaContent {
        MediaContent {
            text: text.to_string(),
            image: None,
        }
    }

    fn question(body: QuestionBody) -> Question {
        Question {
            reading: ReadingContent::empty(),
            question: media("نص السؤال"),
            feedback: String::new(),
            body,
        }
    }

    #[test]
    fn two_questions_no_timer() {
        let questions = vec![
            question(QuestionBody::MultipleChoice {
                options: vec![media("أ"), media("ب")],
                correct: 0,
            }),
            question(QuestionBody::TrueFalse {
                correct_answer: true,
            }),
        ];
        let config = WorksheetConfig::default();
        let doc = generate(&questions, &config);
        assert_eq!(doc.matches("class=\"question-block\"").count(), 2);
        assert!(!doc.contains("id=\"worksheet-timer\""));
        assert!(doc.contains("id=\"question-1\""));
    }

    #[test]
    fn timer_element_appears_when_enabled() {
        let config = WorksheetConfig {
            use_timer: true,
            timer_duration: 5,
            ..WorksheetConfig::default()
        };
        let doc = generate(&[], &config);
        assert!(doc.contains("id=\"worksheet-timer\""));
        assert!(doc.contains("timerMinutes: 5"));
    }

    #[test]
    fn empty_question_list_still_generates() {
        let doc = generate(&[], &WorksheetConfig::default());
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("questionsData = []"));
    }

    #[test]
    fn config_strings_are_escaped() {
        let config = WorksheetConfig {
            title: "<script>alert(1)</script>".into(),
            ..WorksheetConfig::default()
        };
        let doc = generate(&[], &config);
        assert!(!doc.contains("<script>alert(1)</script>"));
        assert!(doc.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn question_numbers_follow_numeral_mode() {
        let questions = vec![question(QuestionBody::TrueFalse {
            correct_answer: true,
        })];
        let eastern = generate(&questions, &WorksheetConfig::default());
        assert!(eastern.contains("السؤال ١"));
        let config = WorksheetConfig {
            numeral_type: NumeralMode::Western,
            ..WorksheetConfig::default()
        };
        let western = generate(&questions, &config);
        assert!(western.contains("السؤال 1"));
    }

    #[test]
    fn shuffled_markup_keeps_original_indices() {
        let questions = vec![question(QuestionBody::Ordering {
            items: vec![media("١"), media("٢"), media("٣")],
        })];
        let doc = generate(&questions, &WorksheetConfig::default());
        for i in 0..3 {
            assert!(doc.contains(&format!("data-original-index=\"{}\"", i)));
        }
    }

    #[test]
    fn runtime_appears_exactly_once() {
        let doc = generate(&[], &WorksheetConfig::default());
        assert_eq!(doc.matches("function makeRuntime").count(), 1);
    }
}
