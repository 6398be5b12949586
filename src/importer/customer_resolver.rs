// ==========================================
// 客户与抄表导入系统 - 客户名称解析
// ==========================================
// 职责: 抄表行的自由文本 customerName → 花名册中唯一客户
// 口径: "名 姓" 去首尾空白后大小写不敏感精确相等；不做模糊/部分匹配
// ==========================================

use crate::domain::{Customer, DuplicateNamePolicy};

/// 名称解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CustomerMatch<'a> {
    Found(&'a Customer),
    NotFound,
    /// 花名册中同名客户数（≥ 2），仅在 Reject 策略下产生
    Ambiguous(usize),
}

impl<'a> CustomerMatch<'a> {
    pub fn customer(&self) -> Option<&'a Customer> {
        match self {
            CustomerMatch::Found(c) => Some(c),
            _ => None,
        }
    }
}

/// 名称比对口径（TRIM + 小写）
fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 在花名册中解析客户名称
///
/// # 参数
/// - name: 抄表行中的 customerName（原始值）
/// - roster: 客户花名册（只读）
/// - policy: 重名处理策略
pub fn resolve_customer<'a>(
    name: &str,
    roster: &'a [Customer],
    policy: DuplicateNamePolicy,
) -> CustomerMatch<'a> {
    let key = name_key(name);
    if key.is_empty() {
        return CustomerMatch::NotFound;
    }

    let mut matches = roster.iter().filter(|c| name_key(&c.full_name()) == key);

    let first = match matches.next() {
        Some(c) => c,
        None => return CustomerMatch::NotFound,
    };

    match policy {
        DuplicateNamePolicy::FirstMatch => CustomerMatch::Found(first),
        DuplicateNamePolicy::Reject => {
            let others = matches.count();
            if others == 0 {
                CustomerMatch::Found(first)
            } else {
                CustomerMatch::Ambiguous(others + 1)
            }
        }
    }
}
