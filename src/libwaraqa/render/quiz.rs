use crate::libwaraqa::config::WorksheetConfig;
use crate::libwaraqa::question::Question;
use crate::libwaraqa::render::html::{embed_json, escape_html};
use crate::libwaraqa::render::runtime::runtime_script;

/// Builds the standalone interactive quiz: welcome screen, one question at a
/// time with navigation/pause/per-question countdown, immediate feedback and
/// the certificate flow. All verdicts go through the shared runtime; this
/// module only lays out markup and the driver that feeds the runtime
/// arrangement records read from the DOM.
pub fn generate(questions: &[Question], config: &WorksheetConfig) -> String {
    let mode = config.numeral_type;
    let title = escape_html(&config.title_or("الاختبار التفاعلي"));

    let mut doc = String::with_capacity(64 * 1024 + 4 * 1024 * questions.len());
    doc.push_str("<!DOCTYPE html>\n<html dir=\"rtl\" lang=\"ar\">\n<head>\n");
    doc.push_str("<meta charset=\"utf-8\"/><meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n");
    doc.push_str(&format!("<title>{}</title>\n", title));
    doc.push_str("<link rel=\"preconnect\" href=\"https://fonts.googleapis.com\"/>\n");
    doc.push_str("<link rel=\"preconnect\" href=\"https://fonts.gstatic.com\" crossorigin/>\n");
    doc.push_str("<link href=\"https://fonts.googleapis.com/css2?family=Tajawal:wght@300;500;700&display=swap\" rel=\"stylesheet\"/>\n");
    doc.push_str("<script src=\"https://cdn.jsdelivr.net/npm/dompurify@3.1.6/dist/purify.min.js\"></script>\n");
    doc.push_str("<script src=\"https://cdnjs.cloudflare.com/ajax/libs/html2canvas/1.4.1/html2canvas.min.js\"></script>\n");
    doc.push_str("<style>");
    doc.push_str(STYLES);
    doc.push_str("</style>\n</head>\n<body>\n");

    // welcome screen
    doc.push_str("<div id=\"welcomeScreen\" class=\"welcome-screen\">\n<div class=\"welcome-main\">\n");
    if let Some(logo) = &config.logo {
        doc.push_str(&format!(
            "<div class=\"header-logo\"><img src=\"{}\" alt=\"{}\" class=\"welcome-logo\"/></div>\n",
            escape_html(logo),
            escape_html(&config.logo_alt)
        ));
    }
    doc.push_str(&format!("<h1 class=\"welcome-title\">{}</h1>\n", title));
    doc.push_str("<button class=\"start-btn\" onclick=\"startQuiz()\">بسم الله نبدأ</button>\n</div>\n");
    if !config.footer.trim().is_empty() {
        doc.push_str(&format!(
            "<footer id=\"teacherFooter\">{}</footer>\n",
            escape_html(&config.footer)
        ));
    }
    doc.push_str("</div>\n");

    // quiz screen
    doc.push_str("<div id=\"quizContainer\" style=\"display: none;\">\n<div class=\"container\">\n");
    doc.push_str("<div class=\"header header-grid\">");
    if let Some(logo) = &config.logo {
        doc.push_str(&format!(
            "<div class=\"header-logo\"><img src=\"{}\" alt=\"{}\"/></div>",
            escape_html(logo),
            escape_html(&config.logo_alt)
        ));
    }
    doc.push_str(&format!(
        "<div class=\"header-main\"><h1 id=\"quizTitle\">{}</h1><p id=\"instructions\">{}</p></div></div>\n",
        title,
        escape_html(&config.instructions)
    ));
    doc.push_str(concat!(
        "<div class=\"counters\" id=\"countersBox\">",
        "<div id=\"questionCounter\"></div>",
        "<div id=\"timer\"></div>",
        "<div id=\"scoreCounter\"></div></div>\n",
        "<div class=\"reading-text\" id=\"readingText\" style=\"display:none\"></div>\n",
        "<div class=\"quiz-box\">",
        "<div class=\"question\" id=\"question\"></div>",
        "<div id=\"options\"></div>",
        "<div class=\"controls\">",
        "<button class=\"nav-btn\" id=\"prevBtn\" onclick=\"previousQuestion()\" disabled>السابق</button>",
        "<button class=\"nav-btn pause-btn\" id=\"pauseBtn\" onclick=\"togglePause()\">إيقاف مؤقت</button>",
        "<button class=\"nav-btn\" id=\"nextBtn\" onclick=\"nextQuestion()\">التالي</button>",
        "</div>",
        "<div class=\"progress-bar\"><div class=\"progress\" id=\"progress\"></div></div>",
        "</div>\n",
        "<div class=\"score-board\" id=\"scoreBoard\" style=\"display:none;\">",
        "<h2> نتيجتك النهائية: <span id=\"finalScore\"></span>/<span id=\"totalQuestions\"></span> </h2>",
        "<div class=\"no-certificate-message\" id=\"noCertificateMsg\" style=\"display: none\">",
        "<p>للحصول على شهادة الإنجاز، يجب تحقيق 80% على الأقل من الدرجة الكلية</p>",
        "<p>حاول مرة أخرى للوصول إلى هذا المستوى!</p></div>",
        "<div class=\"certificate-buttons\">",
        "<button class=\"certificate-btn\" id=\"certificateBtn\" onclick=\"openCertificateForm()\" style=\"display: none\">🏆 الحصول على شهادة الإنجاز</button>",
        "<button class=\"restart-btn\" onclick=\"restartQuiz()\">إعادة المحاولة</button></div></div>\n",
        "</div>\n"
    ));

    // certificate form + certificate
    doc.push_str(concat!(
        "<div class=\"config-panel\" id=\"certificateForm\" style=\"display: none\">",
        "<h3>بيانات الشهادة</h3>",
        "<div class=\"form-group\"><label for=\"studentNameInput\">اسم الطالب:</label>",
        "<input class=\"form-control\" id=\"studentNameInput\" type=\"text\" placeholder=\"أدخل اسم الطالب\" /></div>",
        "<div class=\"form-group form-buttons\">",
        "<button class=\"certificate-btn confirm\" onclick=\"generateCertificate()\">إنشاء الشهادة</button>",
        "<button class=\"certificate-btn close\" onclick=\"closeCertificateForm()\">إلغاء</button></div></div>\n"
    ));
    doc.push_str("<div class=\"certificate-container\" id=\"certificateContainer\"><div class=\"certificate-header\">");
    if let Some(logo) = &config.logo {
        doc.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" class=\"certificate-logo\"/>",
            escape_html(logo),
            escape_html(&config.logo_alt)
        ));
    }
    doc.push_str(&format!(
        "<h2 class=\"certificate-quiz-title\">{}</h2></div>",
        title
    ));
    doc.push_str(concat!(
        "<h1 class=\"certificate-title\">شهادة إنجاز</h1>",
        "<div class=\"certificate-body\">",
        "<div class=\"student-name\" id=\"certificateStudentName\"></div>",
        "<div class=\"achievement-text\">تهانينا! لقد أتممت الاختبار التفاعلي بنجاح</div>",
        "<div class=\"score-text\" id=\"certificateScoreText\"></div>",
        "<div class=\"achievement-text\">نظير جهودك المتميزة وإصرارك على التعلّم، نقدم لك هذه الشهادة تقديرًا لإنجازك</div>",
        "<div class=\"teacher-name\" id=\"certificateTeacherName\"></div></div>",
        "<div class=\"certificate-footer\"><p>شهادة معتمدة من نظام الاختبارات التفاعلية</p></div>"
    ));
    if let Some(seal) = &config.seal {
        doc.push_str(&format!(
            "<img src=\"{}\" class=\"certificate-seal\" alt=\"ختم\"/>",
            escape_html(seal)
        ));
    }
    doc.push_str(concat!(
        "<div class=\"certificate-buttons\">",
        "<button class=\"certificate-btn print\" onclick=\"printCertificate()\">🖨️ طباعة الشهادة</button>",
        "<button class=\"certificate-btn confirm\" onclick=\"downloadCertificate()\">📥 حفظ كصورة</button>",
        "<button class=\"certificate-btn close\" onclick=\"closeCertificate()\">✕ إغلاق</button></div></div>\n"
    ));

    doc.push_str("<script>\n");
    doc.push_str(&runtime_script(mode));
    doc.push_str(&format!("var questionsData = {};\n", embed_json(&questions)));
    doc.push_str(&format!(
        "var DOC = {{ questionTime: {}, teacherName: {} }};\n",
        config.question_seconds(),
        embed_json(&config.teacher_name_or_default())
    ));
    doc.push_str(DRIVER_JS);
    doc.push_str("</script>\n</body>\n</html>");
    doc
}

const STYLES: &str = "\
:root { --color-primary: #007bff; --color-primary-dark: #0056b3; --color-success: #28a745; --color-danger: #dc3545; --color-warning: #ffc107; --color-light: #f8f9fa; --color-dark: #343a40; --color-text: #212529; --color-bg: #f4f7f6; --radius-sm: 8px; --radius-md: 12px; --radius-lg: 16px; --shadow-sm: 0 2px 8px rgba(0, 0, 0, 0.05); --shadow-md: 0 4px 12px rgba(0, 0, 0, 0.08); }\
* { box-sizing: border-box; font-family: 'Tajawal', 'Segoe UI', Tahoma, sans-serif; }\
body { background-color: var(--color-bg); min-height: 100vh; margin: 0; padding: 20px; color: var(--color-text); }\
.container { max-width: 900px; margin: 20px auto; }\
.welcome-screen { display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 95vh; text-align: center; padding: 20px; }\
.welcome-logo { max-width: 150px; max-height: 150px; border-radius: var(--radius-md); margin-bottom: 20px; }\
.welcome-title { font-size: 2.2em; color: var(--color-primary); margin-bottom: 25px; }\
.start-btn { background-color: var(--color-primary); color: white; border: none; padding: 15px 30px; font-size: 1.2em; border-radius: 8px; cursor: pointer; transition: transform 0.2s; box-shadow: var(--shadow-sm); }\
.start-btn:hover { transform: translateY(-2px); }\
.header { margin-bottom: 24px; padding: 16px; background: #fff; border-radius: var(--radius-lg); box-shadow: var(--shadow-sm); }\
.header-grid { display: grid; grid-template-columns: 140px 1fr; align-items: center; gap: 16px; }\
.header-logo img { max-width: 100%; height: auto; object-fit: contain; }\
.header-main { text-align: center; }\
.header-main h1 { margin: 0 0 8px 0; color: var(--color-primary); font-size: 1.8em; }\
.header-main p { margin: 0; font-size: 1.1em; color: #555; }\
.counters { display: flex; flex-wrap: wrap; justify-content: center; gap: 12px; margin: 16px 0; }\
#questionCounter, #timer, #scoreCounter { background: #fff; padding: 16px; border-radius: var(--radius-md); font-weight: 700; font-size: 1.1em; text-align: center; box-shadow: var(--shadow-sm); color: var(--color-dark); display: flex; align-items: center; gap: 10px; }\
#questionCounter::before { content: '📌'; } #scoreCounter::before { content: '🏆'; } #timer::before { content: '⏳'; }\
.reading-text { background: #fff; color: #333; padding: 20px; border-radius: var(--radius-md); margin-bottom: 16px; font-size: 1.15em; line-height: 1.8; box-shadow: var(--shadow-sm); border: 1px solid #e0e0e0; text-align: right; max-height: 250px; overflow-y: auto; }\
.reading-text img, .question img { width: 100%; height: auto; object-fit: contain; max-height: 50vh; border-radius: var(--radius-md); margin: 12px 0; display: block; }\
audio { width: 100%; margin: 8px 0; }\
.quiz-box { background: #fff; border-radius: var(--radius-lg); padding: 24px; box-shadow: var(--shadow-md); position: relative; }\
.question { font-size: 1.5em; margin-bottom: 24px; font-weight: 700; line-height: 1.6; text-align: right; }\
.options { display: grid; grid-template-columns: repeat(2, 1fr); gap: 12px; }\
.option { background: #fff; padding: 16px; border-radius: var(--radius-md); cursor: pointer; transition: transform 0.2s ease, border-color 0.2s ease; border: 2px solid #e0e0e0; min-height: 100px; display: flex; align-items: center; justify-content: center; text-align: center; font-weight: 700; }\
.option:hover { transform: translateY(-4px); border-color: var(--color-primary); }\
.option.correct { background: #e6f7ec; color: #1d643b; border-color: var(--color-success); }\
.option.wrong { background: #fdecea; color: #a52834; border-color: var(--color-danger); }\
.option[aria-disabled=true] { pointer-events: none; opacity: 0.9; }\
.option img { width: 100%; max-height: 100px; object-fit: contain; display: block; }\
.fill-in-blank-container, .short-answer-container { display: flex; flex-direction: column; gap: 12px; align-items: center; }\
.fill-in-blank-input { width: 100%; max-width: 400px; padding: 12px; border: 2px solid #ccc; border-radius: var(--radius-sm); font-size: 1.1em; text-align: center; }\
.short-answer-textarea { width: 100%; max-width: 500px; min-height: 120px; padding: 12px; border: 2px solid #ccc; border-radius: var(--radius-sm); font-size: 1.1em; resize: vertical; }\
.fill-in-blank-input.correct, .short-answer-textarea.correct { background: #e6f7ec; border-color: var(--color-success); }\
.fill-in-blank-input.wrong, .short-answer-textarea.wrong { background: #fdecea; border-color: var(--color-danger); }\
.correct-answer-display { background-color: #e9f7ef; color: #2b6447; padding: 10px 15px; border-radius: var(--radius-sm); font-weight: 600; margin-top: 10px; border: 1px solid #c3e6cb; width: 100%; max-width: 500px; text-align: center; }\
.matching-container { display: flex; flex-wrap: wrap; gap: 20px; justify-content: space-between; margin-bottom: 20px; }\
.matching-column { flex: 1; min-width: 250px; display: flex; flex-direction: column; gap: 10px; }\
.matching-prompt-item { display: flex; align-items: center; gap: 10px; padding: 10px; background-color: var(--color-light); border-radius: var(--radius-sm); border: 1px solid #e0e0e0; }\
.prompt-text { flex: 1; font-weight: 600; }\
.drop-zone { flex: 1; min-height: 48px; border: 2px dashed #ccc; border-radius: var(--radius-sm); transition: background-color 0.2s; display: flex; align-items: center; justify-content: center; padding: 4px; }\
.drop-zone.over { background-color: #e0e0e0; }\
.answer-item { padding: 12px; background-color: #fff; border: 1px solid #ddd; border-radius: var(--radius-sm); cursor: grab; text-align: center; user-select: none; }\
.answer-item.dragging { opacity: 0.5; }\
.answer-item img { max-height: 100px; display: block; margin: 0 auto 5px; max-width: 100%; }\
.drop-zone.correct .answer-item { border-color: var(--color-success); background-color: #e6f7ec; }\
.drop-zone.wrong .answer-item { border-color: var(--color-danger); background-color: #fdecea; }\
.drop-zone.correct { border-color: var(--color-success); }\
.drop-zone.wrong { border-color: var(--color-danger); }\
.ordering-container { display: flex; flex-direction: column; gap: 10px; max-width: 500px; margin: 0 auto 20px auto; border: 2px solid #ccc; padding: 15px; border-radius: var(--radius-md); }\
.ordering-item { padding: 15px; background-color: #fff; border: 1px solid #ddd; border-radius: var(--radius-sm); cursor: grab; user-select: none; display: flex; align-items: center; gap: 10px; }\
.ordering-item::before { content: '☰'; color: #999; font-weight: bold; }\
.ordering-item.dragging { opacity: 0.5; background-color: #e0e0e0; }\
.ordering-container.correct { border-color: var(--color-success); }\
.ordering-container.wrong { border-color: var(--color-danger); }\
.correct-order-display { background-color: #fff3cd; color: #856404; padding: 10px 15px; border-radius: var(--radius-sm); margin-top: 15px; border: 1px solid #ffeeba; text-align: right; }\
.correct-order-display ol { padding-right: 20px; margin: 5px 0; }\
.connecting-lines-container { position: relative; display: flex; justify-content: space-between; gap: 20px; margin-bottom: 20px; }\
.connecting-lines-column { flex: 1; display: flex; flex-direction: column; gap: 15px; z-index: 2; }\
.connect-item { padding: 12px; border: 2px solid #ccc; border-radius: var(--radius-md); cursor: pointer; transition: border-color 0.2s; background-color: #fff; display: flex; align-items: center; min-height: 60px; }\
.connect-item.selected { border-color: var(--color-primary); background-color: #e7f1ff; }\
.connect-item img { max-height: 80px; max-width: 100%; }\
.connect-item.connect-correct { background-color: #e6f7ec; border-color: var(--color-success); }\
.connect-item.connect-wrong { background-color: #fdecea; border-color: var(--color-danger); }\
#connectingLinesCanvas { position: absolute; top: 0; left: 0; width: 100%; height: 100%; pointer-events: none; z-index: 1; }\
.classification-container { display: flex; flex-direction: column; gap: 20px; }\
.classification-groups { display: flex; flex-wrap: wrap; gap: 15px; justify-content: center; margin-bottom: 20px; }\
.group-box { flex: 1; min-width: 200px; background-color: var(--color-light); border: 2px solid var(--color-primary-dark); border-radius: var(--radius-md); padding: 10px; display: flex; flex-direction: column; }\
.group-header { background-color: var(--color-primary-dark); color: white; padding: 8px; text-align: center; border-radius: 8px 8px 0 0; font-weight: bold; margin: -10px -10px 10px -10px; }\
.group-drop-zone { min-height: 100px; background-color: #fff; border: 2px dashed #ccc; border-radius: var(--radius-sm); padding: 8px; display: flex; flex-wrap: wrap; gap: 8px; align-content: flex-start; }\
.group-drop-zone.over { background-color: #e3f2fd; border-color: #2196f3; }\
.classification-items { display: flex; flex-wrap: wrap; gap: 10px; justify-content: center; padding: 15px; background-color: #f1f1f1; border-radius: var(--radius-md); border: 1px solid #ddd; min-height: 60px; }\
.class-item { padding: 8px 15px; background-color: #fff; border: 1px solid #999; border-radius: 20px; cursor: grab; user-select: none; box-shadow: var(--shadow-sm); font-weight: 500; display: flex; align-items: center; gap: 5px; }\
.class-item img { max-height: 40px; margin: 0; }\
.class-item.dragging { opacity: 0.5; }\
.class-item.correct { background-color: #d4edda; border-color: var(--color-success); color: #155724; }\
.class-item.wrong { background-color: #f8d7da; border-color: var(--color-danger); color: #721c24; }\
.controls { display: flex; flex-wrap: wrap; gap: 12px; justify-content: center; margin-top: 24px; }\
.nav-btn, .restart-btn { border: none; padding: 12px 28px; border-radius: var(--radius-sm); cursor: pointer; font-size: 1.05em; font-weight: 600; transition: transform 0.2s ease; background: var(--color-primary); color: #fff; }\
.nav-btn:hover, .restart-btn:hover { transform: translateY(-2px); }\
.nav-btn:disabled { background: #adb5bd; cursor: not-allowed; transform: none; }\
.pause-btn { background: var(--color-warning); color: #000; }\
.custom-submit-container { width: 100%; text-align: center; margin-top: 20px; }\
.progress-bar { height: 10px; background: #e9ecef; border-radius: 5px; margin: 20px 0 10px 0; overflow: hidden; }\
.progress { height: 100%; background: var(--color-success); width: 0; transition: width 0.3s ease; border-radius: 5px; }\
.score-board { text-align: center; font-size: 1.5em; background: #fff; padding: 32px; border-radius: var(--radius-lg); box-shadow: var(--shadow-md); }\
.no-certificate-message { background: #fff3cd; color: #856404; padding: 16px; border-radius: var(--radius-md); margin: 24px 0; border: 1px solid #ffeaa7; }\
.certificate-buttons { display: flex; flex-wrap: wrap; align-items: center; justify-content: center; gap: 15px; margin-top: 25px; }\
.certificate-btn { background: var(--color-success); color: white; border: none; padding: 12px 25px; border-radius: var(--radius-sm); cursor: pointer; font-size: 1.1em; font-weight: 600; transition: all 0.2s ease; }\
.certificate-btn:hover { filter: brightness(90%); transform: translateY(-2px); }\
.certificate-btn.print { background: var(--color-primary); }\
.certificate-btn.confirm { background: var(--color-success); }\
.certificate-btn.close { background: #6c757d; }\
.certificate-container { display: none; max-width: 800px; margin: 20px auto; background: #fff; border: 10px solid var(--color-primary); border-radius: var(--radius-lg); padding: 30px; box-shadow: var(--shadow-md); position: relative; text-align: center; }\
.certificate-seal { position: absolute; left: 30px; bottom: 50px; max-width: 120px; max-height: 120px; opacity: 0.9; object-fit: contain; z-index: 10; }\
.certificate-header { display: flex; flex-direction: column; align-items: center; gap: 15px; margin-bottom: 10px; }\
.certificate-logo { max-width: 100px; }\
.certificate-quiz-title { color: var(--color-dark); font-size: 1.5em; font-weight: 500; margin: 0; }\
.certificate-title { color: var(--color-primary); font-size: 2.8em; font-weight: bold; margin: 15px 0 20px 0; }\
.certificate-body { margin: 30px 0; padding: 20px; border: 2px dashed var(--color-primary); border-radius: var(--radius-md); background: var(--color-light); }\
.student-name { font-size: 2em; color: var(--color-primary-dark); margin: 20px 0; font-weight: bold; }\
.achievement-text { font-size: 1.3em; margin: 15px 0; }\
.score-text { font-size: 1.4em; color: var(--color-success); font-weight: bold; }\
.teacher-name { font-size: 1.3em; color: var(--color-primary-dark); margin-top: 30px; }\
.certificate-footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #ccc; color: #666; }\
.config-panel { position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%); background: #fff; padding: 24px; border-radius: var(--radius-lg); box-shadow: 0 5px 20px rgba(0, 0, 0, 0.2); display: none; z-index: 9999; width: 92%; max-width: 520px; text-align: right; }\
.config-panel h3 { margin-top: 0; color: var(--color-primary); text-align: center; }\
.form-group { margin-top: 16px; }\
.form-control { width: 100%; padding: 12px; border-radius: var(--radius-sm); border: 1px solid #ccc; font-size: 1em; }\
.form-group label { display: block; margin-bottom: 6px; font-weight: 600; }\
.form-buttons { display: flex; justify-content: center; gap: 15px; flex-wrap: wrap; }\
.feedback-box { margin-top: 20px; padding: 15px; border-radius: var(--radius-md); font-size: 1.05em; line-height: 1.7; border: 1px solid; }\
.feedback-box.correct { background-color: #e6f7ec; border-color: var(--color-success); color: #1d643b; }\
.feedback-box.wrong { background-color: #fff3cd; border-color: var(--color-warning); color: #856404; }\
footer { max-width: 900px; margin: 20px auto; text-align: center; padding: 16px; background: #fff; border-radius: var(--radius-md); box-shadow: var(--shadow-sm); font-size: 0.9em; color: #555; }\
@media (max-width: 768px) { body { padding: 10px; } .options { grid-template-columns: 1fr; } .question { font-size: 1.3em; } .header-grid { grid-template-columns: 100px 1fr; } }\
@media print { body > *:not(.certificate-container-print-wrapper) { display: none !important; } .certificate-container-print-wrapper { display: block !important; width: 100% !important; position: absolute; top: 0; left: 0; } .certificate-container-print-wrapper .certificate-container { display: block !important; margin: 0 auto !important; box-shadow: none !important; width: 100% !important; max-width: 100% !important; position: relative !important; transform: none !important; } .certificate-container .certificate-buttons { display: none !important; } body { background: white !important; margin: 0 !important; padding: 0 !important; } }";

const DRIVER_JS: &str = r##"
// one explicit session record instead of scattered globals; every render
// and handler reads and writes through it
var session = {
  questions: questionsData,
  current: 0,
  timeLeft: DOC.questionTime,
  timerId: null,
  paused: false,
  answered: [],
  responses: [],
  shuffledMaps: []
};
var draggedItem = null;
var orderingDragged = null;
var connectState = { from: null, connections: [] };

function el(id) { return document.getElementById(id); }

function formatContent(html) {
  if (!html || typeof html !== "string") return "";
  var clean = typeof DOMPurify !== "undefined" ? DOMPurify.sanitize(html) : html;
  return runtime.formatText(clean);
}

function startQuiz() {
  el("welcomeScreen").style.display = "none";
  el("quizContainer").style.display = "block";
  document.querySelector(".quiz-box").style.display = "block";
  el("countersBox").style.display = "flex";
  if (session.answered.length !== session.questions.length) {
    session.answered = new Array(session.questions.length).fill(null);
    session.responses = new Array(session.questions.length).fill(null);
  }
  if (session.questions.length > 0) {
    if (session.current >= session.questions.length) session.current = 0;
    showQuestion();
  } else {
    updateCounters();
  }
}

function score() {
  return session.answered.filter(function (a) { return a === true; }).length;
}

function updateCounters() {
  var total = session.questions.length;
  el("questionCounter").textContent =
    "السؤال " + runtime.formatNumber(total > 0 ? session.current + 1 : 0) +
    " من " + runtime.formatNumber(total);
  el("scoreCounter").textContent =
    "النتيجة: " + runtime.formatNumber(score()) + " من " + runtime.formatNumber(total);
  el("timer").textContent =
    "الوقت المتبقي: " + runtime.formatNumber(session.timeLeft) + " ثانية";
}

function startTimer() {
  clearInterval(session.timerId);
  if (session.questions.length === 0) return;
  session.timerId = setInterval(function () {
    if (session.paused) return;
    if (session.timeLeft > 0) {
      session.timeLeft--;
      updateCounters();
    }
    if (session.timeLeft <= 0) {
      // expiry counts as a skip: no point, move forward, never block
      clearInterval(session.timerId);
      nextQuestion();
    }
  }, 1000);
}

function togglePause() {
  var b = el("pauseBtn");
  session.paused = !session.paused;
  b.textContent = session.paused ? "استئناف" : "إيقاف مؤقت";
  b.style.background = session.paused ? "#28a745" : "#ffc107";
  b.style.color = session.paused ? "#fff" : "#000";
}

function mediaFragment(content, parent) {
  if (content.image) {
    var img = document.createElement("img");
    img.src = content.image;
    parent.appendChild(img);
  }
  if (content.text) {
    var span = document.createElement("span");
    span.innerHTML = formatContent(content.text);
    parent.appendChild(span);
  }
}

function submitButton(optionsEl) {
  var holder = document.createElement("div");
  holder.className = "custom-submit-container";
  var btn = document.createElement("button");
  btn.textContent = "تأكيد الإجابة";
  btn.className = "nav-btn";
  btn.onclick = function () { commitAnswer(collectResponse()); };
  holder.appendChild(btn);
  optionsEl.appendChild(holder);
}

function showQuestion() {
  clearInterval(session.timerId);
  session.paused = false;
  var pauseBtn = el("pauseBtn");
  pauseBtn.textContent = "إيقاف مؤقت";
  pauseBtn.style.background = "#ffc107";
  pauseBtn.style.color = "#000";
  session.timeLeft = DOC.questionTime;
  connectState = { from: null, connections: [] };

  var old = document.querySelector(".feedback-box");
  if (old) old.remove();

  var q = session.questions[session.current];
  var answered = session.answered[session.current] !== null;

  var reading = el("readingText");
  reading.innerHTML = "";
  if (q.reading && (q.reading.text || q.reading.image || q.reading.audio)) {
    reading.style.display = "block";
    if (q.reading.text) {
      var d = document.createElement("div");
      d.innerHTML = formatContent(q.reading.text);
      reading.appendChild(d);
    }
    if (q.reading.audio) {
      var aud = document.createElement("audio");
      aud.controls = true;
      aud.preload = "none";
      aud.src = q.reading.audio;
      reading.appendChild(aud);
    }
    if (q.reading.image) {
      var img = document.createElement("img");
      img.src = q.reading.image;
      reading.appendChild(img);
    }
  } else {
    reading.style.display = "none";
  }

  var questionEl = el("question");
  questionEl.innerHTML = "";
  if (q.question && q.question.text) {
    var qt = document.createElement("div");
    qt.innerHTML = formatContent(q.question.text);
    questionEl.appendChild(qt);
  }
  if (q.question && q.question.image) {
    var qi = document.createElement("img");
    qi.src = q.question.image;
    questionEl.appendChild(qi);
  }

  var optionsEl = el("options");
  optionsEl.innerHTML = "";
  optionsEl.className = "";
  renderers[q.type](q, optionsEl, answered);

  if (answered && q.feedback && q.feedback.trim() !== "") {
    var box = document.createElement("div");
    box.className = "feedback-box " + (session.answered[session.current] ? "correct" : "wrong");
    box.innerHTML = formatContent(q.feedback);
    document.querySelector(".quiz-box").insertBefore(box, document.querySelector(".quiz-box .controls"));
  }

  var total = session.questions.length;
  el("progress").style.width = (total > 0 ? (session.current / total) * 100 : 0) + "%";
  el("prevBtn").disabled = session.current === 0;
  updateCounters();
  startTimer();
}

var renderers = {
  "multiple-choice": function (q, optionsEl, answered) {
    optionsEl.className = "options";
    var map = session.shuffledMaps[session.current];
    if (!map) {
      map = runtime.shuffle((q.options || []).length);
      session.shuffledMaps[session.current] = map;
    }
    var response = session.responses[session.current];
    map.forEach(function (origIdx) {
      var opt = q.options[origIdx];
      if (!opt || (!opt.text && !opt.image)) return;
      var wrap = document.createElement("div");
      wrap.className = "option";
      mediaFragment(opt, wrap);
      if (answered) {
        wrap.setAttribute("aria-disabled", "true");
        if (origIdx === q.correct) wrap.classList.add("correct");
        if (response && response.selected === origIdx && origIdx !== q.correct) wrap.classList.add("wrong");
      } else {
        wrap.onclick = function () { commitAnswer({ selected: origIdx }); };
      }
      optionsEl.appendChild(wrap);
    });
  },
  "true-false": function (q, optionsEl, answered) {
    optionsEl.className = "options";
    [true, false].forEach(function (value) {
      var btn = document.createElement("div");
      btn.className = "option";
      btn.textContent = value ? "صح" : "خطأ";
      if (answered) {
        btn.setAttribute("aria-disabled", "true");
        if (q.correctAnswer === value) btn.classList.add("correct");
        var response = session.responses[session.current];
        if (response && response.selected === value && value !== q.correctAnswer) btn.classList.add("wrong");
      } else {
        btn.onclick = function () { commitAnswer({ selected: value }); };
      }
      optionsEl.appendChild(btn);
    });
  },
  "fill-in-the-blank": function (q, optionsEl, answered) {
    var form = document.createElement("form");
    form.className = "fill-in-blank-container";
    var input = document.createElement("input");
    input.type = "text";
    input.className = "fill-in-blank-input";
    input.placeholder = "اكتب إجابتك هنا";
    var btn = document.createElement("button");
    btn.type = "submit";
    btn.textContent = "تأكيد الإجابة";
    btn.className = "nav-btn";
    form.onsubmit = function (e) {
      e.preventDefault();
      commitAnswer({ text: input.value });
    };
    form.appendChild(input);
    form.appendChild(btn);
    optionsEl.appendChild(form);
    if (answered) {
      var response = session.responses[session.current];
      input.value = response ? response.text : "";
      input.disabled = true;
      btn.style.display = "none";
      input.classList.add(session.answered[session.current] ? "correct" : "wrong");
      if (!session.answered[session.current]) {
        var ca = document.createElement("div");
        ca.className = "correct-answer-display";
        ca.textContent = "الإجابة الصحيحة: " + String(q.correctAnswer || "").split("|")[0].trim();
        form.appendChild(ca);
      }
    }
  },
  "short-answer": function (q, optionsEl, answered) {
    var form = document.createElement("form");
    form.className = "short-answer-container";
    var area = document.createElement("textarea");
    area.className = "short-answer-textarea";
    area.placeholder = "اكتب إجابتك هنا...";
    var btn = document.createElement("button");
    btn.type = "submit";
    btn.textContent = "تأكيد الإجابة";
    btn.className = "nav-btn";
    form.onsubmit = function (e) {
      e.preventDefault();
      commitAnswer({ text: area.value });
    };
    form.appendChild(area);
    form.appendChild(btn);
    optionsEl.appendChild(form);
    if (answered) {
      var response = session.responses[session.current];
      area.value = response ? response.text : "";
      area.disabled = true;
      btn.style.display = "none";
      area.classList.add(session.answered[session.current] ? "correct" : "wrong");
      if (!session.answered[session.current]) {
        var ca = document.createElement("div");
        ca.className = "correct-answer-display";
        ca.textContent = "إحدى الإجابات النموذجية: " + String(q.correctAnswer || "").split("|")[0].trim();
        form.appendChild(ca);
      }
    }
  },
  "ordering": function (q, optionsEl, answered) {
    var container = document.createElement("div");
    container.className = "ordering-container";
    var sequence;
    if (answered) {
      sequence = session.responses[session.current].order;
    } else {
      sequence = runtime.shuffle((q.items || []).length);
    }
    sequence.forEach(function (origIdx) {
      var item = q.items[origIdx];
      var entry = document.createElement("div");
      entry.className = "ordering-item";
      entry.draggable = !answered;
      entry.dataset.originalIndex = origIdx;
      mediaFragment(item, entry);
      container.appendChild(entry);
    });
    optionsEl.appendChild(container);
    if (answered) {
      container.classList.add(session.answered[session.current] ? "correct" : "wrong");
      if (!session.answered[session.current]) {
        var display = document.createElement("div");
        display.className = "correct-order-display";
        var html = "<strong>الترتيب الصحيح:</strong><ol>";
        q.items.forEach(function (it) { html += "<li>" + formatContent(it.text || "") + "</li>"; });
        display.innerHTML = html + "</ol>";
        optionsEl.appendChild(display);
      }
      return;
    }
    container.querySelectorAll(".ordering-item").forEach(function (item) {
      item.addEventListener("dragstart", function () {
        orderingDragged = item;
        setTimeout(function () { item.classList.add("dragging"); }, 0);
      });
      item.addEventListener("dragend", function () { item.classList.remove("dragging"); });
    });
    container.addEventListener("dragover", function (e) {
      e.preventDefault();
      var after = orderingAfterElement(container, e.clientY);
      if (after == null) container.appendChild(orderingDragged);
      else container.insertBefore(orderingDragged, after);
    });
    submitButton(optionsEl);
  },
  "matching": function (q, optionsEl, answered) {
    var container = document.createElement("div");
    container.className = "matching-container";
    var promptsColumn = document.createElement("div");
    promptsColumn.className = "matching-column";
    var answersColumn = document.createElement("div");
    answersColumn.className = "matching-column answers-column";

    (q.pairs || []).forEach(function (pair, index) {
      var item = document.createElement("div");
      item.className = "matching-prompt-item";
      var text = document.createElement("div");
      text.className = "prompt-text";
      mediaFragment(pair.prompt, text);
      item.appendChild(text);
      var drop = document.createElement("div");
      drop.className = "drop-zone";
      drop.dataset.index = index;
      item.appendChild(drop);
      promptsColumn.appendChild(item);
      if (!answered) {
        drop.addEventListener("dragover", function (e) { e.preventDefault(); drop.classList.add("over"); });
        drop.addEventListener("dragleave", function () { drop.classList.remove("over"); });
        drop.addEventListener("drop", function (e) {
          e.preventDefault();
          drop.classList.remove("over");
          if (!draggedItem) return;
          if (drop.firstChild) answersColumn.appendChild(drop.firstChild);
          drop.appendChild(draggedItem);
          draggedItem = null;
        });
      }
    });

    function answerElement(origIdx, draggable) {
      var item = document.createElement("div");
      item.className = "answer-item";
      item.draggable = draggable;
      item.dataset.originalIndex = origIdx;
      mediaFragment(q.pairs[origIdx].answer, item);
      return item;
    }

    if (answered) {
      var placements = session.responses[session.current].placements;
      promptsColumn.querySelectorAll(".drop-zone").forEach(function (zone) {
        var zoneIdx = parseInt(zone.dataset.index, 10);
        var occupant = placements[zoneIdx];
        if (occupant !== null && occupant !== undefined) {
          zone.appendChild(answerElement(occupant, false));
          zone.classList.add(occupant === zoneIdx ? "correct" : "wrong");
        } else {
          zone.classList.add("wrong");
        }
      });
      answersColumn.style.display = "none";
    } else {
      runtime.shuffle((q.pairs || []).length).forEach(function (origIdx) {
        var item = answerElement(origIdx, true);
        answersColumn.appendChild(item);
        item.addEventListener("dragstart", function () {
          draggedItem = item;
          setTimeout(function () { item.classList.add("dragging"); }, 0);
        });
        item.addEventListener("dragend", function () { item.classList.remove("dragging"); });
      });
    }

    container.appendChild(promptsColumn);
    container.appendChild(answersColumn);
    optionsEl.appendChild(container);
    if (!answered) submitButton(optionsEl);
  },
  "connecting-lines": function (q, optionsEl, answered) {
    optionsEl.className = "connecting-lines-container";
    var promptCol = document.createElement("div");
    promptCol.className = "connecting-lines-column";
    var answerCol = document.createElement("div");
    answerCol.className = "connecting-lines-column";

    (q.pairs || []).forEach(function (pair, i) {
      var item = document.createElement("div");
      item.className = "connect-item";
      item.dataset.side = "prompt";
      item.dataset.index = i;
      mediaFragment(pair.prompt, item);
      promptCol.appendChild(item);
    });
    runtime.shuffle((q.pairs || []).length).forEach(function (origIdx) {
      var item = document.createElement("div");
      item.className = "connect-item";
      item.dataset.side = "answer";
      item.dataset.index = origIdx;
      mediaFragment(q.pairs[origIdx].answer, item);
      answerCol.appendChild(item);
    });

    var canvas = document.createElement("canvas");
    canvas.id = "connectingLinesCanvas";
    optionsEl.appendChild(promptCol);
    optionsEl.appendChild(answerCol);
    optionsEl.appendChild(canvas);

    if (answered) {
      connectState.connections = session.responses[session.current].connections || [];
      setTimeout(function () { drawConnections(true); }, 50);
      return;
    }

    optionsEl.querySelectorAll(".connect-item").forEach(function (item) {
      item.addEventListener("click", function () {
        var side = item.dataset.side;
        var index = parseInt(item.dataset.index, 10);
        var existing = connectState.connections.find(function (c) {
          return side === "prompt" ? c.promptIndex === index : c.answerIndex === index;
        });
        if (connectState.from && connectState.from.side !== side) {
          if (existing) return;
          var promptIndex = side === "prompt" ? index : connectState.from.index;
          var answerIndex = side === "answer" ? index : connectState.from.index;
          connectState.connections.push({ promptIndex: promptIndex, answerIndex: answerIndex });
          optionsEl.querySelectorAll(".connect-item.selected").forEach(function (s) { s.classList.remove("selected"); });
          connectState.from = null;
          drawConnections(false);
        } else if (existing) {
          // clicking a connected node disconnects it first
          connectState.connections = connectState.connections.filter(function (c) { return c !== existing; });
          drawConnections(false);
        } else {
          optionsEl.querySelectorAll(".connect-item.selected").forEach(function (s) { s.classList.remove("selected"); });
          item.classList.add("selected");
          connectState.from = { side: side, index: index };
        }
      });
    });
    submitButton(optionsEl);
    setTimeout(function () { drawConnections(false); }, 50);
  },
  "classification": function (q, optionsEl, answered) {
    optionsEl.className = "classification-container";
    var groupsContainer = document.createElement("div");
    groupsContainer.className = "classification-groups";
    var zones = {};
    (q.groups || []).forEach(function (group) {
      var groupBox = document.createElement("div");
      groupBox.className = "group-box";
      var header = document.createElement("div");
      header.className = "group-header";
      header.innerHTML = formatContent(group.text);
      var zone = document.createElement("div");
      zone.className = "group-drop-zone";
      zone.dataset.groupId = group.id;
      zones[group.id] = zone;
      groupBox.appendChild(header);
      groupBox.appendChild(zone);
      groupsContainer.appendChild(groupBox);
    });
    var pool = document.createElement("div");
    pool.className = "classification-items";

    function classItem(origIdx, draggable) {
      var item = q.items[origIdx];
      var entry = document.createElement("div");
      entry.className = "class-item";
      entry.draggable = draggable;
      entry.dataset.groupId = item.groupId;
      entry.dataset.itemIndex = origIdx;
      mediaFragment(item, entry);
      return entry;
    }

    if (answered) {
      var response = session.responses[session.current];
      (response.placed || []).forEach(function (p) {
        var entry = classItem(p.itemIndex, false);
        entry.classList.add(p.itemGroupId !== "" && p.itemGroupId === p.zoneGroupId ? "correct" : "wrong");
        var zone = zones[p.zoneGroupId];
        if (zone) zone.appendChild(entry);
      });
      (response.poolItems || []).forEach(function (origIdx) {
        var entry = classItem(origIdx, false);
        entry.classList.add("wrong");
        pool.appendChild(entry);
      });
    } else {
      runtime.shuffle((q.items || []).length).forEach(function (origIdx) {
        pool.appendChild(classItem(origIdx, true));
      });
    }

    optionsEl.appendChild(groupsContainer);
    optionsEl.appendChild(pool);
    if (answered) return;

    optionsEl.querySelectorAll(".class-item").forEach(function (item) {
      item.addEventListener("dragstart", function () {
        draggedItem = item;
        setTimeout(function () { item.classList.add("dragging"); }, 0);
      });
      item.addEventListener("dragend", function () {
        item.classList.remove("dragging");
        draggedItem = null;
      });
    });
    optionsEl.querySelectorAll(".group-drop-zone").forEach(function (zone) {
      zone.addEventListener("dragover", function (e) { e.preventDefault(); zone.classList.add("over"); });
      zone.addEventListener("dragleave", function () { zone.classList.remove("over"); });
      zone.addEventListener("drop", function (e) {
        e.preventDefault();
        zone.classList.remove("over");
        if (draggedItem) zone.appendChild(draggedItem);
      });
    });
    // items may always be dragged back to the pool
    pool.addEventListener("dragover", function (e) { e.preventDefault(); });
    pool.addEventListener("drop", function (e) {
      e.preventDefault();
      if (draggedItem) pool.appendChild(draggedItem);
    });
    submitButton(optionsEl);
  }
};

function orderingAfterElement(container, y) {
  var closest = { offset: Number.NEGATIVE_INFINITY, element: null };
  container.querySelectorAll(".ordering-item:not(.dragging)").forEach(function (child) {
    var box = child.getBoundingClientRect();
    var offset = y - box.top - box.height / 2;
    if (offset < 0 && offset > closest.offset) closest = { offset: offset, element: child };
  });
  return closest.element;
}

function drawConnections(showFeedback) {
  var canvas = document.getElementById("connectingLinesCanvas");
  if (!canvas) return;
  var container = canvas.parentElement;
  var rect = container.getBoundingClientRect();
  canvas.width = rect.width;
  canvas.height = rect.height;
  var ctx = canvas.getContext("2d");
  ctx.clearRect(0, 0, rect.width, rect.height);
  connectState.connections.forEach(function (conn) {
    var from = container.querySelector('[data-side="prompt"][data-index="' + conn.promptIndex + '"]');
    var to = container.querySelector('[data-side="answer"][data-index="' + conn.answerIndex + '"]');
    if (!from || !to) return;
    var fRect = from.getBoundingClientRect();
    var tRect = to.getBoundingClientRect();
    ctx.beginPath();
    ctx.moveTo(fRect.right - rect.left, fRect.top + fRect.height / 2 - rect.top);
    ctx.lineTo(tRect.left - rect.left, tRect.top + tRect.height / 2 - rect.top);
    ctx.lineWidth = 3;
    if (showFeedback) {
      ctx.strokeStyle = conn.promptIndex === conn.answerIndex ? "#28a745" : "#dc3545";
      from.classList.add(conn.promptIndex === conn.answerIndex ? "connect-correct" : "connect-wrong");
      to.classList.add(conn.promptIndex === conn.answerIndex ? "connect-correct" : "connect-wrong");
    } else {
      ctx.strokeStyle = "#007bff";
    }
    ctx.stroke();
  });
}

// Reads the current arrangement out of the DOM as plain data for the
// shared runtime; only the gesture-free record crosses this boundary.
function collectResponse() {
  var q = session.questions[session.current];
  var optionsEl = el("options");
  switch (q.type) {
    case "ordering": {
      var order = [];
      optionsEl.querySelectorAll(".ordering-item").forEach(function (item) {
        order.push(parseInt(item.dataset.originalIndex, 10));
      });
      return { order: order };
    }
    case "matching": {
      var placements = [];
      optionsEl.querySelectorAll(".drop-zone").forEach(function (zone) {
        var occupant = zone.querySelector(".answer-item");
        placements[parseInt(zone.dataset.index, 10)] =
          occupant ? parseInt(occupant.dataset.originalIndex, 10) : null;
      });
      return { placements: placements };
    }
    case "connecting-lines":
      return { connections: connectState.connections.slice() };
    case "classification": {
      var placed = [];
      optionsEl.querySelectorAll(".group-drop-zone").forEach(function (zone) {
        zone.querySelectorAll(".class-item").forEach(function (item) {
          placed.push({
            itemIndex: parseInt(item.dataset.itemIndex, 10),
            itemGroupId: item.dataset.groupId,
            zoneGroupId: zone.dataset.groupId
          });
        });
      });
      var poolItems = [];
      optionsEl.querySelectorAll(".classification-items .class-item").forEach(function (item) {
        poolItems.push(parseInt(item.dataset.itemIndex, 10));
      });
      return { pool: poolItems.length, placed: placed, poolItems: poolItems };
    }
    default:
      return {};
  }
}

// verdict commit and lock are atomic within this handler: once a question
// is answered it stays locked for the whole play-through
function commitAnswer(response) {
  if (session.answered[session.current] !== null) return;
  var q = session.questions[session.current];
  var isCorrect = runtime.grade(q, response);
  session.answered[session.current] = isCorrect;
  session.responses[session.current] = response;
  updateCounters();
  showQuestion();
  setTimeout(function () {
    if (session.current < session.questions.length - 1) nextQuestion();
    else showResult();
  }, 2000);
}

function nextQuestion() {
  if (session.current < session.questions.length - 1) {
    session.current++;
    showQuestion();
  } else {
    showResult();
  }
}

function previousQuestion() {
  if (session.current > 0) {
    session.current--;
    showQuestion();
  }
}

function showResult() {
  clearInterval(session.timerId);
  document.querySelector(".quiz-box").style.display = "none";
  el("readingText").style.display = "none";
  el("countersBox").style.display = "none";
  el("scoreBoard").style.display = "block";
  el("finalScore").textContent = runtime.formatNumber(score());
  el("totalQuestions").textContent = runtime.formatNumber(session.questions.length);
  var total = session.questions.length;
  var percentage = total > 0 ? (score() / total) * 100 : 0;
  var passed = percentage >= runtime.PASS_PERCENTAGE;
  el("certificateBtn").style.display = passed ? "block" : "none";
  el("noCertificateMsg").style.display = passed ? "none" : "block";
}

function restartQuiz() {
  clearInterval(session.timerId);
  session.current = 0;
  session.timeLeft = DOC.questionTime;
  session.paused = false;
  session.answered = new Array(session.questions.length).fill(null);
  session.responses = new Array(session.questions.length).fill(null);
  session.shuffledMaps = [];
  el("scoreBoard").style.display = "none";
  el("quizContainer").style.display = "none";
  el("welcomeScreen").style.display = "flex";
  el("progress").style.width = "0%";
  el("prevBtn").disabled = true;
}

function openCertificateForm() { el("certificateForm").style.display = "block"; }
function closeCertificateForm() { el("certificateForm").style.display = "none"; }
function closeCertificate() { el("certificateContainer").style.display = "none"; }

function generateCertificate() {
  var studentName = el("studentNameInput").value.trim();
  if (!studentName) {
    alert("يرجى إدخال اسم الطالب");
    return;
  }
  el("certificateStudentName").textContent = studentName;
  el("certificateTeacherName").textContent = "المعلم: " + DOC.teacherName;
  var total = session.questions.length;
  var percentage = total > 0 ? Math.round((score() / total) * 100) : 0;
  el("certificateScoreText").textContent =
    "حققت نتيجة " + runtime.formatNumber(score()) + " من " +
    runtime.formatNumber(total) + " (" + runtime.formatNumber(percentage) + "%)";
  closeCertificateForm();
  el("certificateContainer").style.display = "block";
}

function printCertificate() {
  var cert = el("certificateContainer");
  var wrapper = document.createElement("div");
  wrapper.className = "certificate-container-print-wrapper";
  wrapper.appendChild(cert.cloneNode(true));
  document.body.appendChild(wrapper);
  setTimeout(function () {
    window.print();
    document.body.removeChild(wrapper);
  }, 100);
}

function downloadCertificate() {
  var cert = el("certificateContainer");
  var buttons = cert.querySelector(".certificate-buttons");
  if (buttons) buttons.style.display = "none";
  html2canvas(cert, { scale: 2, useCORS: true, logging: false })
    .then(function (canvas) {
      var link = document.createElement("a");
      var studentName = el("certificateStudentName").textContent.trim() || "student";
      link.download = "شهادة_إنجاز_" + studentName + ".png";
      link.href = canvas.toDataURL("image/png", 1.0);
      link.click();
    })
    .finally(function () {
      if (buttons) buttons.style.display = "flex";
    });
}

window.startQuiz = startQuiz;
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libwaraqa::question::{MediaContent, QuestionBody, ReadingContent};

    fn question(body: QuestionBody) -> Question {
        Question {
            reading: ReadingContent::empty(),
            question: MediaContent {
                text: "نص".into(),
                image: None,
            },
            feedback: String::new(),
            body,
        }
    }

    #[test]
    fn generates_a_complete_document() {
        let questions = vec![question(QuestionBody::TrueFalse {
            correct_answer: true,
        })];
        let config = WorksheetConfig {
            title: "اختبار الوحدة".into(),
            question_time: Some(30),
            ..WorksheetConfig::default()
        };
        let doc = generate(&questions, &config);
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.ends_with("</html>"));
        assert!(doc.contains("اختبار الوحدة"));
        assert!(doc.contains("questionTime: 30"));
        assert!(doc.contains("id=\"welcomeScreen\""));
        assert!(doc.contains("id=\"quizContainer\""));
    }

    #[test]
    fn question_time_defaults_to_45_seconds() {
        let doc = generate(&[], &WorksheetConfig::default());
        assert!(doc.contains("questionTime: 45"));
    }

    #[test]
    fn runtime_appears_exactly_once() {
        let doc = generate(&[], &WorksheetConfig::default());
        assert_eq!(doc.matches("function makeRuntime").count(), 1);
    }

    #[test]
    fn embedded_snapshot_cannot_break_out_of_script() {
        let questions = vec![question(QuestionBody::FillInTheBlank {
            correct_answer: "</script><script>alert(1)</script>".into(),
        })];
        let doc = generate(&questions, &WorksheetConfig::default());
        // the only </script> closers are the ones the generator wrote
        let closers = doc.matches("</script>").count();
        assert_eq!(closers, 3); // DOMPurify tag, html2canvas tag, the driver
    }

    #[test]
    fn renderers_cover_all_eight_types() {
        for kind in crate::libwaraqa::question::ALL_KINDS {
            assert!(
                DRIVER_JS.contains(&format!("\"{}\"", kind.as_str())),
                "driver lacks a renderer for {}",
                kind.as_str()
            );
        }
    }
}
