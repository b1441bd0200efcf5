use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{
    ActivityDefinition, ActivityTag, AnswerType, AssessmentQuestion, ComplianceModule,
    ComplianceStatus, ModuleId, QuestionId,
};
use super::locale::LocalizedText;

pub const STANDARD_CATALOG_VERSION: &str = "2024.1";

/// Percentage cut-offs mapping a score to a status label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub compliant: f64,
    pub at_risk: f64,
}

impl StatusThresholds {
    pub fn status_for(&self, percentage: f64) -> ComplianceStatus {
        if percentage >= self.compliant {
            ComplianceStatus::Compliant
        } else if percentage >= self.at_risk {
            ComplianceStatus::AtRisk
        } else {
            ComplianceStatus::NonCompliant
        }
    }

    fn is_valid(&self) -> bool {
        self.at_risk.is_finite()
            && self.compliant.is_finite()
            && (0.0..=100.0).contains(&self.at_risk)
            && (0.0..=100.0).contains(&self.compliant)
            && self.at_risk <= self.compliant
    }
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            compliant: 80.0,
            at_risk: 50.0,
        }
    }
}

/// Upper bound for a single question weight.
pub const MAX_QUESTION_WEIGHT: u32 = 10_000;

/// Errors raised while loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog defines no questions")]
    Empty,
    #[error("duplicate module id {0}")]
    DuplicateModule(ModuleId),
    #[error("duplicate activity tag {0}")]
    DuplicateActivity(ActivityTag),
    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),
    #[error("question {question} references unknown module {module}")]
    UnknownModule {
        question: QuestionId,
        module: ModuleId,
    },
    #[error("question {question} references unknown activity {activity}")]
    UnknownActivity {
        question: QuestionId,
        activity: ActivityTag,
    },
    #[error("question {0} applies to no activity")]
    NoActivities(QuestionId),
    #[error("question {0} must carry a positive weight")]
    ZeroWeight(QuestionId),
    #[error("question {question} weight {weight} exceeds the maximum of {max}", max = MAX_QUESTION_WEIGHT)]
    WeightTooLarge { question: QuestionId, weight: u32 },
    #[error("catalog weights sum to {0}, which does not fit a 32-bit total")]
    TotalWeightTooLarge(u64),
    #[error("thresholds must satisfy 0 <= at_risk ({at_risk}) <= compliant ({compliant}) <= 100")]
    InvalidThresholds { compliant: f64, at_risk: f64 },
}

/// On-disk catalog layout, validated into a [`QuestionCatalog`].
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDocument {
    pub version: String,
    #[serde(default)]
    pub thresholds: StatusThresholds,
    pub modules: Vec<ComplianceModule>,
    pub activities: Vec<ActivityDefinition>,
    pub questions: Vec<AssessmentQuestion>,
}

/// Versioned, ordered set of modules, activities, and questions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionCatalog {
    version: String,
    thresholds: StatusThresholds,
    modules: Vec<ComplianceModule>,
    activities: Vec<ActivityDefinition>,
    questions: Vec<AssessmentQuestion>,
}

impl TryFrom<CatalogDocument> for QuestionCatalog {
    type Error = CatalogError;

    fn try_from(document: CatalogDocument) -> Result<Self, Self::Error> {
        let CatalogDocument {
            version,
            thresholds,
            modules,
            activities,
            questions,
        } = document;

        if !thresholds.is_valid() {
            return Err(CatalogError::InvalidThresholds {
                compliant: thresholds.compliant,
                at_risk: thresholds.at_risk,
            });
        }
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut module_ids = HashSet::new();
        for module in &modules {
            if !module_ids.insert(&module.id) {
                return Err(CatalogError::DuplicateModule(module.id.clone()));
            }
        }

        let mut activity_tags = HashSet::new();
        for activity in &activities {
            if !activity_tags.insert(&activity.tag) {
                return Err(CatalogError::DuplicateActivity(activity.tag.clone()));
            }
        }

        let mut question_ids = HashSet::new();
        let mut total_weight: u64 = 0;
        for question in &questions {
            if !question_ids.insert(&question.id) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            if !module_ids.contains(&question.module) {
                return Err(CatalogError::UnknownModule {
                    question: question.id.clone(),
                    module: question.module.clone(),
                });
            }
            if question.weight == 0 {
                return Err(CatalogError::ZeroWeight(question.id.clone()));
            }
            if question.weight > MAX_QUESTION_WEIGHT {
                return Err(CatalogError::WeightTooLarge {
                    question: question.id.clone(),
                    weight: question.weight,
                });
            }
            total_weight += u64::from(question.weight);
            if question.activities.is_empty() {
                return Err(CatalogError::NoActivities(question.id.clone()));
            }
            if let Some(activity) = question
                .activities
                .iter()
                .find(|tag| !activity_tags.contains(tag))
            {
                return Err(CatalogError::UnknownActivity {
                    question: question.id.clone(),
                    activity: activity.clone(),
                });
            }
        }

        // Module and overall sums are subsets of this total.
        if total_weight > u64::from(u32::MAX) {
            return Err(CatalogError::TotalWeightTooLarge(total_weight));
        }

        Ok(Self {
            version,
            thresholds,
            modules,
            activities,
            questions,
        })
    }
}

impl QuestionCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::try_from(document)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn thresholds(&self) -> &StatusThresholds {
        &self.thresholds
    }

    pub fn modules(&self) -> &[ComplianceModule] {
        &self.modules
    }

    pub fn module(&self, id: &ModuleId) -> Option<&ComplianceModule> {
        self.modules.iter().find(|module| &module.id == id)
    }

    pub fn activities(&self) -> &[ActivityDefinition] {
        &self.activities
    }

    pub fn knows_activity(&self, tag: &ActivityTag) -> bool {
        self.activities.iter().any(|activity| &activity.tag == tag)
    }

    pub fn questions(&self) -> &[AssessmentQuestion] {
        &self.questions
    }

    pub fn question(&self, id: &QuestionId) -> Option<&AssessmentQuestion> {
        self.questions.iter().find(|question| &question.id == id)
    }

    /// Built-in bilingual catalog covering the common business activities.
    pub fn standard() -> Self {
        Self {
            version: STANDARD_CATALOG_VERSION.to_string(),
            thresholds: StatusThresholds::default(),
            modules: standard_modules(),
            activities: standard_activities(),
            questions: standard_questions(),
        }
    }
}

const ALL_ACTIVITIES: [&str; 6] = [
    "retail",
    "e_commerce",
    "food_service",
    "financial_services",
    "import_export",
    "real_estate",
];

fn standard_modules() -> Vec<ComplianceModule> {
    [
        ("licensing", "Licensing & Registration", "التراخيص والتسجيل"),
        ("data_protection", "Data Protection", "حماية البيانات"),
        ("consumer_protection", "Consumer Protection", "حماية المستهلك"),
        ("aml", "Anti-Money Laundering", "مكافحة غسل الأموال"),
        ("health_safety", "Health & Safety", "الصحة والسلامة"),
    ]
    .into_iter()
    .map(|(id, en, ar)| ComplianceModule {
        id: ModuleId::from(id),
        title: LocalizedText::en_ar(en, ar),
    })
    .collect()
}

fn standard_activities() -> Vec<ActivityDefinition> {
    [
        ("retail", "Retail trade", "تجارة التجزئة"),
        ("e_commerce", "Online selling", "التجارة الإلكترونية"),
        ("food_service", "Food & beverage service", "خدمات الأغذية والمشروبات"),
        ("financial_services", "Financial services", "الخدمات المالية"),
        ("import_export", "Import & export", "الاستيراد والتصدير"),
        ("real_estate", "Real estate brokerage", "الوساطة العقارية"),
    ]
    .into_iter()
    .map(|(tag, en, ar)| ActivityDefinition {
        tag: ActivityTag::new(tag),
        label: LocalizedText::en_ar(en, ar),
    })
    .collect()
}

struct QuestionSeed {
    id: &'static str,
    module: &'static str,
    prompt: (&'static str, &'static str),
    guidance: Option<(&'static str, &'static str)>,
    activities: &'static [&'static str],
    answer_type: AnswerType,
    weight: u32,
}

impl From<QuestionSeed> for AssessmentQuestion {
    fn from(seed: QuestionSeed) -> Self {
        AssessmentQuestion {
            id: QuestionId::from(seed.id),
            module: ModuleId::from(seed.module),
            prompt: LocalizedText::en_ar(seed.prompt.0, seed.prompt.1),
            guidance: seed
                .guidance
                .map(|(en, ar)| LocalizedText::en_ar(en, ar)),
            activities: seed.activities.iter().map(ActivityTag::new).collect(),
            answer_type: seed.answer_type,
            weight: seed.weight,
        }
    }
}

fn standard_questions() -> Vec<AssessmentQuestion> {
    let seeds = [
        QuestionSeed {
            id: "lic-01",
            module: "licensing",
            prompt: (
                "Is your commercial registration valid and renewed?",
                "هل سجلك التجاري ساري المفعول ومجدد؟",
            ),
            guidance: Some((
                "Renew the commercial registration before operating further.",
                "جدد السجل التجاري قبل مواصلة النشاط.",
            )),
            activities: &ALL_ACTIVITIES,
            answer_type: AnswerType::YesNo,
            weight: 20,
        },
        QuestionSeed {
            id: "lic-02",
            module: "licensing",
            prompt: (
                "Do you hold a municipal license for each physical premises?",
                "هل لديك رخصة بلدية لكل منشأة فعلية؟",
            ),
            guidance: Some((
                "Apply for a municipal license for every branch and warehouse.",
                "تقدم بطلب رخصة بلدية لكل فرع ومستودع.",
            )),
            activities: &["retail", "food_service"],
            answer_type: AnswerType::YesNoNa,
            weight: 15,
        },
        QuestionSeed {
            id: "lic-03",
            module: "licensing",
            prompt: (
                "Is your online store registered with the e-commerce authority?",
                "هل متجرك الإلكتروني مسجل لدى الجهة المختصة بالتجارة الإلكترونية؟",
            ),
            guidance: Some((
                "Register the store and display the registration number on the site.",
                "سجل المتجر واعرض رقم التسجيل على الموقع.",
            )),
            activities: &["e_commerce"],
            answer_type: AnswerType::YesNo,
            weight: 10,
        },
        QuestionSeed {
            id: "lic-04",
            module: "licensing",
            prompt: (
                "Do you hold a valid import/export license and customs code?",
                "هل لديك ترخيص استيراد وتصدير ساري ورمز جمركي؟",
            ),
            guidance: None,
            activities: &["import_export"],
            answer_type: AnswerType::YesNo,
            weight: 15,
        },
        QuestionSeed {
            id: "lic-05",
            module: "licensing",
            prompt: (
                "Are your brokerage practitioners individually licensed?",
                "هل جميع الوسطاء العاملين لديك مرخصون بشكل فردي؟",
            ),
            guidance: Some((
                "Enroll unlicensed practitioners in the brokerage licensing program.",
                "سجل الوسطاء غير المرخصين في برنامج ترخيص الوساطة.",
            )),
            activities: &["real_estate"],
            answer_type: AnswerType::Graded,
            weight: 15,
        },
        QuestionSeed {
            id: "dp-01",
            module: "data_protection",
            prompt: (
                "Do you publish a privacy notice explaining how personal data is used?",
                "هل تنشر إشعار خصوصية يوضح كيفية استخدام البيانات الشخصية؟",
            ),
            guidance: Some((
                "Publish a privacy notice covering purpose, retention, and data subject rights.",
                "انشر إشعار خصوصية يغطي الغرض ومدة الاحتفاظ وحقوق أصحاب البيانات.",
            )),
            activities: &["retail", "e_commerce", "financial_services", "real_estate"],
            answer_type: AnswerType::Graded,
            weight: 10,
        },
        QuestionSeed {
            id: "dp-02",
            module: "data_protection",
            prompt: (
                "Do you obtain consent before sending marketing messages?",
                "هل تحصل على الموافقة قبل إرسال الرسائل التسويقية؟",
            ),
            guidance: Some((
                "Collect opt-in consent and honor unsubscribe requests.",
                "احصل على موافقة مسبقة والتزم بطلبات إلغاء الاشتراك.",
            )),
            activities: &["retail", "e_commerce", "financial_services"],
            answer_type: AnswerType::YesNoNa,
            weight: 10,
        },
        QuestionSeed {
            id: "dp-03",
            module: "data_protection",
            prompt: (
                "Is customer data stored with access controls and encryption?",
                "هل تُخزَّن بيانات العملاء مع ضوابط وصول وتشفير؟",
            ),
            guidance: Some((
                "Restrict access by role and encrypt customer records at rest.",
                "قيد الوصول حسب الأدوار وشفّر سجلات العملاء المخزنة.",
            )),
            activities: &["e_commerce", "financial_services", "real_estate"],
            answer_type: AnswerType::Graded,
            weight: 15,
        },
        QuestionSeed {
            id: "cp-01",
            module: "consumer_protection",
            prompt: (
                "Are prices displayed clearly, including VAT?",
                "هل تُعرض الأسعار بوضوح شاملة ضريبة القيمة المضافة؟",
            ),
            guidance: Some((
                "Show VAT-inclusive prices on shelves, menus, and product pages.",
                "اعرض الأسعار شاملة الضريبة على الرفوف والقوائم وصفحات المنتجات.",
            )),
            activities: &["retail", "e_commerce", "food_service"],
            answer_type: AnswerType::Graded,
            weight: 10,
        },
        QuestionSeed {
            id: "cp-02",
            module: "consumer_protection",
            prompt: (
                "Do you have a documented return and refund policy?",
                "هل لديك سياسة موثقة للإرجاع والاسترداد؟",
            ),
            guidance: Some((
                "Document the return window and refund method and share it before purchase.",
                "وثّق مدة الإرجاع وطريقة الاسترداد وأطلع العميل عليها قبل الشراء.",
            )),
            activities: &["retail", "e_commerce"],
            answer_type: AnswerType::YesNo,
            weight: 10,
        },
        QuestionSeed {
            id: "cp-03",
            module: "consumer_protection",
            prompt: (
                "Are invoices issued in Arabic for every sale?",
                "هل تصدر الفواتير باللغة العربية لكل عملية بيع؟",
            ),
            guidance: None,
            activities: &["retail", "e_commerce", "food_service", "import_export"],
            answer_type: AnswerType::GradedNa,
            weight: 5,
        },
        QuestionSeed {
            id: "aml-01",
            module: "aml",
            prompt: (
                "Do you verify customer identity before establishing a business relationship?",
                "هل تتحقق من هوية العميل قبل إنشاء علاقة عمل؟",
            ),
            guidance: Some((
                "Apply know-your-customer checks and keep copies of identity documents.",
                "طبّق إجراءات اعرف عميلك واحتفظ بنسخ من وثائق الهوية.",
            )),
            activities: &["financial_services", "real_estate"],
            answer_type: AnswerType::Graded,
            weight: 20,
        },
        QuestionSeed {
            id: "aml-02",
            module: "aml",
            prompt: (
                "Have you appointed a compliance officer to report suspicious transactions?",
                "هل عيّنت مسؤول التزام للإبلاغ عن المعاملات المشبوهة؟",
            ),
            guidance: Some((
                "Appoint a compliance officer and register them with the financial intelligence unit.",
                "عيّن مسؤول التزام وسجله لدى وحدة التحريات المالية.",
            )),
            activities: &["financial_services", "real_estate", "import_export"],
            answer_type: AnswerType::YesNo,
            weight: 15,
        },
        QuestionSeed {
            id: "hs-01",
            module: "health_safety",
            prompt: (
                "Do all food handlers hold valid health certificates?",
                "هل يحمل جميع العاملين في تداول الأغذية شهادات صحية سارية؟",
            ),
            guidance: Some((
                "Book medical examinations for staff without a valid certificate.",
                "احجز فحوصات طبية للعاملين الذين لا يحملون شهادة سارية.",
            )),
            activities: &["food_service"],
            answer_type: AnswerType::YesNo,
            weight: 20,
        },
        QuestionSeed {
            id: "hs-02",
            module: "health_safety",
            prompt: (
                "Are fire safety systems inspected and certified?",
                "هل يتم فحص أنظمة السلامة من الحرائق واعتمادها؟",
            ),
            guidance: None,
            activities: &["retail", "food_service"],
            answer_type: AnswerType::GradedNa,
            weight: 10,
        },
    ];

    seeds.into_iter().map(AssessmentQuestion::from).collect()
}
